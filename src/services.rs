pub mod emails;
pub mod order_pipeline;
pub mod review_import;
pub mod subscription_sync;
