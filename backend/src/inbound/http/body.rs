//! JSON body extractor with field-level type errors.
//!
//! `web::Json<T>` reports a wrongly typed field as a failure of the whole
//! body. [`JsonBody`] reads the payload as a JSON value first, so syntax and
//! content-type problems still go through the `JsonConfig` error handler, and
//! then deserializes `T` while tracking the path of the offending field.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use serde_path_to_error::{Path, Segment};

use crate::domain::Error;

/// Request body deserialized into `T`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonBody<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let raw = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(value) = raw.await?;
            decode(value).map(JsonBody).map_err(actix_web::Error::from)
        })
    }
}

fn pointer(path: &Path) -> String {
    path.iter()
        .map(|segment| match segment {
            Segment::Seq { index } => format!("/{index}"),
            Segment::Map { key } => format!("/{}", key.replace('~', "~0").replace('/', "~1")),
            Segment::Enum { variant } => format!("/{variant}"),
            Segment::Unknown => "/?".to_owned(),
        })
        .collect()
}

/// Deserialize `value`, naming the first field that has the wrong type.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let source = value.clone();
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path();
        let reason = err.inner().to_string();
        if path.iter().next().is_none() {
            return Error::validation(format!("invalid JSON body: {reason}"))
                .with_details(json!({ "field": "body", "code": "invalid_json" }));
        }
        let field = path.to_string();
        let mut details = json!({ "field": field, "code": "invalid_type" });
        if let (Some(offending), Some(map)) =
            (source.pointer(&pointer(path)), details.as_object_mut())
        {
            map.insert("value".to_owned(), offending.clone());
        }
        Error::validation(format!("{field}: {reason}")).with_details(details)
    })
}
