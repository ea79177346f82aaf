//! Fixture builders shared by unit tests

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

/// Encode a tiny grey JPEG with no metadata at all
pub fn plain_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([128, 128, 128]));
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .encode_image(&img)
        .unwrap();
    jpeg
}

/// Encode a JPEG carrying an EXIF block with the given lens, focal length and f-number
pub fn tagged_jpeg(lens: Option<&str>, focal_mm: Option<f64>, f_number: Option<f64>) -> Vec<u8> {
    let mut fields = vec![Field {
        tag: Tag::Make,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"TestCam".to_vec()]),
    }];
    if let Some(mm) = focal_mm {
        fields.push(rational_field(Tag::FocalLength, mm));
    }
    if let Some(f) = f_number {
        fields.push(rational_field(Tag::FNumber, f));
    }
    if let Some(lens) = lens {
        fields.push(Field {
            tag: Tag::LensModel,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![lens.as_bytes().to_vec()]),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    // Splice an APP1 "Exif" segment right after SOI
    let jpeg = plain_jpeg();
    let mut out = jpeg[..2].to_vec();
    let segment_len = (2 + 6 + tiff.len()) as u16;
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn rational_field(tag: Tag, value: f64) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational {
            num: (value * 10.0).round() as u32,
            denom: 10,
        }]),
    }
}
