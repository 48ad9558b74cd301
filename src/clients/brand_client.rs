use crate::domain::Brand;
use crate::resource_framework::ResourceClient;

/// Client for the `marca` collection.
#[derive(Clone)]
pub struct BrandClient {
    inner: ResourceClient<Brand>,
}

impl_basic_client!(BrandClient, Brand, brand, brands);
