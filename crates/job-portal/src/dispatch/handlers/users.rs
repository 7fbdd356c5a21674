use serde_json::json;

use crate::dispatch::request::ApiRequest;
use crate::dispatch::response::ApiResponse;
use crate::domain::User;
use crate::error::PortalError;
use crate::service::Services;

pub(crate) fn put_user(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let user: User = request.parse_body()?;
    services.users.upsert(&user)?;
    Ok(ApiResponse::ok(json!({
        "message": "User upserted",
        "user": user,
    })))
}

pub(crate) fn get_user(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let user = if let Some(id) = request.query("id") {
        services.users.find_by_id(id)?
    } else if let Some(username) = request.query("username") {
        services.users.find_by_username(username)?
    } else {
        return Err(PortalError::validation(
            "Query parameter 'id' or 'username' is required",
        ));
    };
    match user {
        Some(user) => Ok(ApiResponse::ok(user)),
        None => Ok(ApiResponse::not_found("User not found")),
    }
}

pub(crate) fn list_users(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let (page, size) = request.page_params();
    let listing = if request.include_deleted() {
        services.users.list_all(page, size)?
    } else {
        services.users.list_active(page, size)?
    };
    Ok(ApiResponse::ok(listing))
}

pub(crate) fn delete_user(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.users.soft_delete(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "User soft-deleted",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("User not found")),
    }
}
