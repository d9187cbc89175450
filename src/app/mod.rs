pub mod extract_use_case;
pub mod ports;
pub mod rank_use_case;
