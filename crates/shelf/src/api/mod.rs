//! Outbound HTTP used to enrich books with metadata.

use serde::de::DeserializeOwned;

mod google_books;

pub use google_books::MetadataClient;

/// A blocking HTTP client able to fetch and deserialize JSON documents.
///
/// Implemented for [`reqwest::blocking::Client`]; other implementations exist so lookups can be
/// exercised without a network.
pub trait Client {
    /// Issue a GET request to `url` and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the request cannot be sent, an [`ErrorKind::Status`] error
    /// for a non-success status code and an [`ErrorKind::Deserialize`] error when the body is not
    /// the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        let resp = resp.error_for_status().map_err(|e| {
            Error::wrap(ErrorKind::Status, e).with_message(format!("Failed to fetch data: {status}"))
        })?;

        resp.json()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, Producer, StatusErrorProducer,
    URL_SINK,
};

use crate::{Error, ErrorKind};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static URL_SINK: std::cell::RefCell<Option<String>> = std::cell::RefCell::new(None);
    }

    /// Asserts that the expected URL is the same as the one provided to the [`MockClient`].
    ///
    /// The [`MockClient`] will update the static thread local `URL_SINK` with the URL string that
    /// was passed to it, this allows for asserting that the lookup builds the correct URL.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::URL_SINK.with(|url| url.borrow().clone().unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce() -> Result<T, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer<String> = EmptyObjectProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer<String>> Client for MockClient<P> {
        fn get_json<T>(&self, url: &str) -> Result<T, Error>
        where
            T: DeserializeOwned,
        {
            URL_SINK.with(|sink| *sink.borrow_mut() = Some(url.to_owned()));
            P::produce().and_then(|json| {
                serde_json::from_str(&json).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
            })
        }
    }

    macro_rules! impl_text_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<String> for $producer {
                    fn produce() -> Result<String, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_text_producer! {
        EmptyObjectProducer => Ok("{}".to_owned()),
        NetworkErrorProducer => Err(Error::new(ErrorKind::IO, "Network error")),
        StatusErrorProducer => Err(Error::new(ErrorKind::Status, "Failed to fetch data: 503")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_text_producer;
}
