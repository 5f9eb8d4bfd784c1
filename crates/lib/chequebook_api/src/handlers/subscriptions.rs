//! Subscription handlers.

use axum::extract::{Path, State};
use chequebook_core::pagination::PageRequest;
use chequebook_core::subscriptions::{
    self, SubscribeRequest, UpdateSubscriptionRequest, status_description,
};
use serde::Deserialize;

use crate::AppState;
use crate::envelope::ApiResponse;
use crate::error::{AppResult, OrFail};
use crate::extract::{ApiJson, ApiQuery};

/// `?page&limit`, kept as raw strings so bad values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// `POST /api/v1/subscriptions/subscribe` — 201 on create, 200 on overwrite.
pub async fn subscribe_handler(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubscribeRequest>,
) -> AppResult<ApiResponse> {
    let upserted = subscriptions::subscribe(state.store.as_ref(), body)
        .await
        .or_fail(&state.config, "Failed to create customer subscription")?;
    if upserted.created {
        ApiResponse::created("Customer subscription created successfully", &upserted.subscription)
    } else {
        ApiResponse::ok("Customer subscription updated successfully", &upserted.subscription)
    }
}

/// `PUT /api/v1/subscriptions/{cust_ac_no}` — partial update.
pub async fn update_subscription_handler(
    State(state): State<AppState>,
    Path(cust_ac_no): Path<String>,
    ApiJson(body): ApiJson<UpdateSubscriptionRequest>,
) -> AppResult<ApiResponse> {
    let updated = subscriptions::update(state.store.as_ref(), &cust_ac_no, body)
        .await
        .or_fail(&state.config, "Failed to update subscription")?;
    ApiResponse::ok("Subscription updated successfully", &updated)
}

/// `PUT /api/v1/subscriptions/unsubscribe/{cust_ac_no}`.
pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    Path(cust_ac_no): Path<String>,
) -> AppResult<ApiResponse> {
    let updated = subscriptions::unsubscribe(state.store.as_ref(), &cust_ac_no)
        .await
        .or_fail(&state.config, "Failed to unsubscribe customer")?;
    ApiResponse::ok("Customer unsubscribed successfully", &updated)
}

/// `GET /api/v1/subscriptions`
pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<ApiResponse> {
    let page = subscriptions::list_all(state.store.as_ref(), params.request())
        .await
        .or_fail(&state.config, "Failed to retrieve subscriptions")?;
    ApiResponse::ok("Subscriptions retrieved successfully", &page)
}

/// `GET /api/v1/subscriptions/filter/{status}`
pub async fn list_subscriptions_by_status_handler(
    State(state): State<AppState>,
    Path(status): Path<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> AppResult<ApiResponse> {
    let status = subscriptions::parse_status(&status)?;
    let page = subscriptions::list_by_status(state.store.as_ref(), status, params.request())
        .await
        .or_fail(&state.config, "Failed to retrieve filtered subscriptions")?;
    let message = format!("{} customers retrieved successfully", status_description(status));
    ApiResponse::ok(&message, &page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_page_params_fall_back_to_defaults() {
        let params = PageParams {
            page: Some("abc".into()),
            limit: Some("-4".into()),
        };
        let req = params.request();
        assert_eq!((req.page(), req.limit()), (1, 10));
    }
}
