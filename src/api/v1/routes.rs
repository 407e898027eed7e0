use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{me, token};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/token/refresh", post(token::refresh))
        .route("/me/seq", get(me::me_seq));

    let protected = Router::new().route("/me", get(me::me));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
