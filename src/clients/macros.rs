/// Generates `new`, `resource` and the five CRUD methods of a typed client
/// wrapping a [`ResourceClient`](crate::resource_framework::ResourceClient).
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident, $plural_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $plural_snake>](&self) -> Result<Vec<$entity>, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.list().await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: i64) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await
                }

                #[tracing::instrument(skip(self, payload))]
                pub async fn [<update_ $entity_name_snake>](
                    &self,
                    id: i64,
                    payload: &<$entity as $crate::resource_framework::Resource>::Payload,
                ) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.update(id, payload).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](&self, id: i64) -> Result<(), $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id).await
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(api: $crate::api::ApiClient) -> Self {
                Self {
                    inner: $crate::resource_framework::ResourceClient::new(api),
                }
            }

            /// The generic client, for the views.
            pub fn resource(&self) -> $crate::resource_framework::ResourceClient<$entity> {
                self.inner.clone()
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident, $plural_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $entity_name_snake, $plural_snake);

        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self, payload))]
                pub async fn [<create_ $entity_name_snake>](
                    &self,
                    payload: &<$entity as $crate::resource_framework::Resource>::Payload,
                ) -> Result<$entity, $crate::error::ApiError> {
                    tracing::debug!("Sending request");
                    self.inner.create(payload).await
                }
            }
        }
    };
}
