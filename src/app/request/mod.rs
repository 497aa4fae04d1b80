use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FundRequest {
    /// Minor currency units, strictly positive.
    pub amount: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PayRequest {
    /// Username of the recipient.
    pub to: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BuyRequest {
    pub product_id: i32,
}
