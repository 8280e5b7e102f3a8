use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize, Serialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct AuthServiceResponse {
    #[serde(rename = "success")]
    _success: bool,
    data: AuthResponse,
}

fn auth_api_base_url() -> String {
    std::env::var("AUTH_API_URL").unwrap_or_else(|_| "http://auth.localhost:8080".to_string())
}

fn session_cookie(name: &str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(cookie::SameSite::Lax);
    cookie
}

pub async fn login_handler(Json(body): Json<LoginBody>) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let url = format!(
        "{}/api/v1/auth/login",
        auth_api_base_url().trim_end_matches('/')
    );

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&json!({
            "email": body.email,
            "password": body.password,
        }))
        .send()
        .await;

    let resp = match response {
        Ok(resp) => resp,
        Err(e) => {
            error!("Auth service unreachable: {}", e);
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "auth_unreachable" })),
            ));
        }
    };

    let status = resp.status();
    if !status.is_success() {
        error!("Auth service rejected login: {}", status);
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_credentials" })),
        ));
    }

    let auth_resp = match resp.json::<AuthServiceResponse>().await {
        Ok(wrapper) => wrapper.data,
        Err(e) => {
            error!("Could not parse auth response: {}", e);
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "auth_parse_failed" })),
            ));
        }
    };

    let access_cookie = session_cookie("access_token", auth_resp.access_token);
    let refresh_cookie = session_cookie("refresh_token", auth_resp.refresh_token);

    let mut response = Json(json!({ "success": true })).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        access_cookie.to_string().parse().unwrap(),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        refresh_cookie.to_string().parse().unwrap(),
    );

    Ok(response)
}

pub async fn logout_handler() -> Response {
    // Clear cookies
    let access_cookie = session_cookie("access_token", String::new());
    let refresh_cookie = session_cookie("refresh_token", String::new());

    let mut response = Json(json!({ "success": true })).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        access_cookie.to_string().parse().unwrap(),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        refresh_cookie.to_string().parse().unwrap(),
    );

    response
}
