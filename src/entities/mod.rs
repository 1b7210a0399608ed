pub mod audit_log;
pub mod discount;
pub mod inventory_batch;
pub mod price_override_request;
pub mod pricing_control;
pub mod transaction_discount;
