use crate::domain::User;
use crate::resource_framework::ResourceClient;

/// Client for the `usuario` collection.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, user, users);
