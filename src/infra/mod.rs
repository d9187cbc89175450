pub mod http_client;
pub mod ranking_output;
pub mod raw_input;
