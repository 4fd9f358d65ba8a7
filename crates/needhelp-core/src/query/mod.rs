pub mod guards;
pub mod scoring;
pub mod topk;
