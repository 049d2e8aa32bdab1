use serde::Serialize;

use super::data_client::DataClient;
use super::error::{ClientError, ClientResult};
use crate::modules::courses::schema::CourseResponse;
use crate::modules::enrollments::schema::{ItemType, RecordPaymentRequest};
use crate::modules::products::schema::ProductResponse;
use crate::modules::users::schema::UserResponse;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub item_type: ItemType,
    pub id: String,
    pub title: String,
    pub price: f64,
}

/// What the external payment overlay is opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Minor units (cents, kobo), as the overlay expects.
    pub amount: u64,
    pub currency: String,
    pub email: String,
    pub item: CheckoutItem,
}

impl CheckoutRequest {
    fn new(user: &UserResponse, currency: &str, item: CheckoutItem) -> ClientResult<Self> {
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(ClientError::Validation("Invalid price".to_string()));
        }
        Ok(Self {
            amount: to_minor_units(item.price),
            currency: currency.to_ascii_uppercase(),
            email: user.email.clone(),
            item,
        })
    }

    pub fn for_course(user: &UserResponse, course: &CourseResponse, currency: &str) -> ClientResult<Self> {
        let item = CheckoutItem {
            item_type: ItemType::Course,
            id: course.id.clone(),
            title: course.title.clone(),
            price: course.price,
        };
        Self::new(user, currency, item)
    }

    pub fn for_product(user: &UserResponse, product: &ProductResponse, currency: &str) -> ClientResult<Self> {
        let item = CheckoutItem {
            item_type: ItemType::Product,
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
        };
        Self::new(user, currency, item)
    }

    /// Major-unit amount recorded with the payment.
    pub fn major_amount(&self) -> f64 {
        self.amount as f64 / 100.0
    }
}

fn to_minor_units(price: f64) -> u64 {
    (price * 100.0).round() as u64
}

/// Success callback of the payment overlay: records the payment and grants the
/// item to the signed-in user. The reference is not verified with the gateway.
pub async fn complete_checkout(
    client: &DataClient,
    request: &CheckoutRequest,
    reference: &str,
) -> ClientResult<UserResponse> {
    let user = client.session().require_user()?;

    let payment = RecordPaymentRequest {
        user_id: user.id.clone(),
        item_type: request.item.item_type,
        item_id: request.item.id.clone(),
        amount: request.major_amount(),
        currency: request.currency.clone(),
        reference: reference.to_string(),
    };
    client.storage().record_payment(&payment).await?;

    tracing::info!(
        user_id = %user.id,
        item_id = %request.item.id,
        reference = %reference,
        "checkout completed"
    );

    let patched = match request.item.item_type {
        ItemType::Course => client.session().record_enrollment(&request.item.id)?,
        ItemType::Product => client.session().record_purchase(&request.item.id)?,
    };
    Ok(patched.unwrap_or(user))
}
