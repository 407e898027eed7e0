pub mod principal_response;
pub mod refresh_request;
pub mod token_response;
