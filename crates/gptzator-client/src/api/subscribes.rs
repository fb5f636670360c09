//! Subscriptions and billing API.

use serde_json::json;

use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::Result;
use crate::query::Query;
use crate::types::{Collection, CouponResponse, PaymentUri, Product, Subscribe};

pub struct SubscribesApi {
    client: GptzatorClient,
}

impl SubscribesApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// The user's subscriptions with their products populated.
    pub async fn list(&self) -> Result<Collection<Subscribe>> {
        api_call(
            "SubscribesApi.list",
            self.client
                .get_with_query("subscribes", Query::new().param("depth", 1)),
        )
        .await
    }

    pub async fn products(&self) -> Result<Collection<Product>> {
        api_call("SubscribesApi.products", self.client.get("products")).await
    }

    /// Payment link for a product.
    pub async fn payment_url(&self, product_id: &str) -> Result<PaymentUri> {
        api_call(
            "SubscribesApi.payment_url",
            self.client.get_with_query(
                "transactions/paymenturi",
                Query::new().param("productId", product_id),
            ),
        )
        .await
    }

    pub async fn apply_coupon(&self, coupon_code: &str) -> Result<CouponResponse> {
        api_call(
            "SubscribesApi.apply_coupon",
            self.client
                .post("coupons/apply", &json!({ "couponCode": coupon_code })),
        )
        .await
    }
}
