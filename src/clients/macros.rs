/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The client type needs a `sender: mpsc::Sender<StoreRequest>` field.
#[macro_export]
macro_rules! client_method {
    ($client:ty => $vis:vis fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[::tracing::instrument(skip(self))]
            $vis async fn $method(&self, $($param: $param_type),*) -> ::std::result::Result<$return_type, $crate::error::ShopError> {
                ::tracing::debug!("Sending request");
                let (respond_to, response) = ::tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $crate::error::ShopError::ActorCommunication("Store closed".to_string()))?;

                response
                    .await
                    .map_err(|_| $crate::error::ShopError::ActorCommunication("Store dropped".to_string()))?
            }
        }
    };
}

/// Generate one `list_<filter>` method per order filter.
#[macro_export]
macro_rules! order_listing {
    ($client:ty => $($filter:ident: $variant:ident),* $(,)?) => {
        ::paste::paste! {
            impl $client {
                $(
                    pub async fn [<list_ $filter>](&self) -> ::std::result::Result<Vec<$crate::domain::OrderRecord>, $crate::error::ShopError> {
                        self.list_orders($crate::domain::OrderFilter::$variant).await
                    }
                )*
            }
        }
    };
}
