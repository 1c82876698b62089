pub mod authorizer;
pub mod url_signer;

pub use authorizer::Authorizer;
pub use url_signer::UploadUrlSigner;
