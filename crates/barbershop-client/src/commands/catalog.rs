//! Barber and service listings.

use barbershop_core::{normalize_barbers, normalize_services};

use super::Context;
use crate::error::ClientResult;

/// Lists barbers.
pub async fn barbers(ctx: &Context) -> ClientResult<String> {
    let body = ctx.api.list_barbers().await?;
    ctx.output.barbers(&normalize_barbers(&body))
}

/// Lists services.
pub async fn services(ctx: &Context) -> ClientResult<String> {
    let body = ctx.api.list_services().await?;
    ctx.output.services(&normalize_services(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use barbershop_api::FixtureBookingApi;
    use serde_json::json;

    #[tokio::test]
    async fn lists_wrapped_barbers() {
        let (ctx, _) = context(FixtureBookingApi::new().with_barbers(json!({
            "results": [
                { "id": 1, "nome": "João Silva" },
                { "_id": "b2", "user": { "name": "Pedro" }, "disponivel": false }
            ]
        })));

        assert_eq!(
            barbers(&ctx).await.unwrap(),
            "[JS] 1  João Silva\n[P] b2  Pedro  indisponível"
        );
    }

    #[tokio::test]
    async fn services_with_comma_prices() {
        let (ctx, _) = context(FixtureBookingApi::new().with_services(json!([
            { "id": 10, "nome": "Corte", "preço": "35,00", "duração": 30 },
            { "id": 11, "titulo": "Sobrancelha", "valor": "abc" }
        ])));

        assert_eq!(
            services(&ctx).await.unwrap(),
            "10  Corte  R$ 35,00  30 min\n11  Sobrancelha  R$ 0,00  0 min"
        );
    }
}
