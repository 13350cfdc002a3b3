//! Paths and query strings of the hosted backend's REST and auth endpoints.

use crate::models::Like;

pub const PROMPTS_TABLE: &str = "prompts";
pub const LIKES_TABLE: &str = "likes";

pub const INCREMENT_LIKES: &str = "increment_likes";
pub const DECREMENT_LIKES: &str = "decrement_likes";

pub const USER_PATH: &str = "/auth/v1/user";
pub const TOKEN_PATH: &str = "/auth/v1/token";
pub const LOGOUT_PATH: &str = "/auth/v1/logout";

pub fn table_path(table: &str) -> String {
    format!("/rest/v1/{}", table)
}

pub fn rpc_path(function: &str) -> String {
    format!("/rest/v1/rpc/{}", function)
}

/// Prompt listing, newest first, optionally restricted to one owner.
pub fn prompt_query(owner: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    if let Some(user_id) = owner {
        params.push(("user_id", eq(user_id)));
    }
    params.push(("order", "created_at.desc".to_string()));
    params
}

pub fn liked_ids_query(user_id: &str) -> Vec<(&'static str, String)> {
    vec![("select", "prompt_id".to_string()), ("user_id", eq(user_id))]
}

pub fn like_filter(like: &Like) -> Vec<(&'static str, String)> {
    vec![
        ("user_id", eq(&like.user_id)),
        ("prompt_id", eq(&like.prompt_id)),
    ]
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}
