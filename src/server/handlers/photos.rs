use axum::{
    extract::{Extension, Json, Multipart, Path},
    http::header::CONTENT_TYPE,
};
use uuid::Uuid;

use super::Deleted;
use crate::{
    api::DynAPI,
    auth::User,
    entities::{Coordinates, NewPhoto, Photo, PhotoFile},
    error::{invalid_input_error, Error},
};

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Photo>>, Error> {
    let photos = api.list_photos().await?;

    Ok(photos.into())
}

/// Multipart fields: `file`, `caption`, `location`, `lat`, `lng`.
pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    mut multipart: Multipart,
) -> Result<Json<Photo>, Error> {
    let mut form = PhotoForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("photo").to_string();
            let content_type = field
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;

            form.file = Some(PhotoFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await?;
            form.set(&name, value)?;
        }
    }

    let (params, file) = form.finish()?;
    let photo = api.create_photo(user, params, file).await?;

    Ok(photo.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, Error> {
    let deleted = api.delete_photo(user, id).await?;

    Ok(Deleted { deleted }.into())
}

#[derive(Default)]
struct PhotoForm {
    file: Option<PhotoFile>,
    caption: Option<String>,
    location: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl PhotoForm {
    fn set(&mut self, name: &str, value: String) -> Result<(), Error> {
        match name {
            "caption" => self.caption = Some(value),
            "location" => self.location = Some(value),
            "lat" => self.lat = Some(parse_number(name, &value)?),
            "lng" => self.lng = Some(parse_number(name, &value)?),
            _ => tracing::debug!(field = name, "ignoring unknown form field"),
        }

        Ok(())
    }

    fn finish(self) -> Result<(NewPhoto, PhotoFile), Error> {
        let missing = |field: &str| invalid_input_error().with_details(format!("{} is required", field));

        let file = self.file.ok_or_else(|| missing("file"))?;
        if file.bytes.is_empty() {
            return Err(invalid_input_error().with_details("file is empty"));
        }

        let params = NewPhoto {
            caption: self.caption,
            location: self.location.ok_or_else(|| missing("location"))?,
            coordinates: Coordinates::new(
                self.lat.ok_or_else(|| missing("lat"))?,
                self.lng.ok_or_else(|| missing("lng"))?,
            ),
        };

        Ok((params, file))
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_input_error().with_details(format!("{} must be a number", name)))
}

#[test]
fn photo_form_test() {
    let mut form = PhotoForm::default();
    form.set("caption", "Sunset".into()).unwrap();
    form.set("location", "Page, AZ".into()).unwrap();
    form.set("lat", " 36.9147 ".into()).unwrap();
    form.set("lng", "-111.4558".into()).unwrap();
    form.set("unexpected", "ignored".into()).unwrap();
    form.file = Some(PhotoFile {
        file_name: "sunset.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff],
    });

    let (params, file) = form.finish().unwrap();

    assert_eq!(params.caption.as_deref(), Some("Sunset"));
    assert_eq!(params.location, "Page, AZ");
    assert_eq!(params.coordinates, Coordinates::new(36.9147, -111.4558));
    assert_eq!(file.file_name, "sunset.jpg");
}

#[test]
fn photo_form_errors_test() {
    let mut form = PhotoForm::default();
    let err = form.set("lat", "north".into()).unwrap_err();
    assert_eq!(err.details.as_deref(), Some("lat must be a number"));

    form.set("location", "Page, AZ".into()).unwrap();
    let err = form.finish().unwrap_err();
    assert_eq!(err.details.as_deref(), Some("file is required"));

    let form = PhotoForm {
        file: Some(PhotoFile {
            file_name: "empty.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![],
        }),
        ..PhotoForm::default()
    };
    let err = form.finish().unwrap_err();
    assert_eq!(err.details.as_deref(), Some("file is empty"));
}
