// Media upload
//
// Images are uploaded once as multipart and referenced by URL afterwards;
// the media resource rejects update and delete.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::{ApiClient, ApiResponse, Resource};
use crate::error::Error;
use crate::models::{Envelope, Media};

/// Multipart field the backend reads the file from.
const FILE_FIELD: &str = "file";

impl ApiClient {
    /// Upload an image and return its stored record (including its URL).
    ///
    /// `POST /{version}/media` as `multipart/form-data` with a `file` part.
    pub async fn upload_media(&self, file_name: &str, bytes: Vec<u8>) -> Result<Media, Error> {
        debug!(file_name, size = bytes.len(), "uploading media");
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new().part(FILE_FIELD, part);

        let envelope: Envelope<Media> = self
            .endpoint(Resource::MEDIA)
            .upload(form)
            .await
            .map(ApiResponse::into_data)?;

        envelope.result.ok_or_else(|| Error::Deserialization {
            message: "upload response carried no result".into(),
            body: envelope.detail.unwrap_or_default(),
        })
    }
}
