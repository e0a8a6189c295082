use std::io::Cursor;

/// EXIF Orientation（1..=8）を読む。EXIFがなければ None
pub fn read_orientation(data: &[u8]) -> Option<u8> {
    let mut cursor = Cursor::new(data);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut cursor).ok()?;

    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    u8::try_from(value).ok().filter(|v| (1..=8).contains(v))
}
