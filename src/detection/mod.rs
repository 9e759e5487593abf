pub mod client;
pub mod impl_fake;
pub mod impl_lazy;
pub mod impl_roboflow;
pub mod impl_tract_onnx;
pub mod interface;
pub mod label;
pub mod tract;

#[cfg(test)]
mod tests;
