use crate::core::VatError;

#[cfg(feature = "vies")]
pub use writer::XmlWriter;

fn malformed(e: impl std::fmt::Display) -> VatError {
    VatError::unavailable(format!("malformed XML response: {e}"))
}

/// Decode an XML response body, treating any decode failure as the
/// service being unavailable.
#[cfg(feature = "abn")]
pub fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, VatError> {
    quick_xml::de::from_str(body).map_err(malformed)
}

/// Text of the first `<name>` element directly inside a `<parent>` element.
///
/// Elements are matched by local name, so namespace prefixes are ignored.
#[cfg(feature = "vies")]
pub fn find_text(xml: &str, parent: &str, name: &str) -> Result<Option<String>, VatError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut path: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => path.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                if let [.., p, n] = path.as_slice() {
                    if p == parent.as_bytes() && n == name.as_bytes() {
                        let text = e.unescape().map_err(malformed)?;
                        return Ok(Some(text.into_owned()));
                    }
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(malformed(e)),
        }
    }
}

#[cfg(feature = "vies")]
mod writer {
    use quick_xml::Writer;
    use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
    use std::io::Cursor;

    use crate::core::VatError;

    fn xml_io(e: std::io::Error) -> VatError {
        VatError::unavailable(format!("XML write error: {e}"))
    }

    pub struct XmlWriter {
        writer: Writer<Cursor<Vec<u8>>>,
    }

    impl XmlWriter {
        pub fn new() -> Result<Self, VatError> {
            let mut writer = Writer::new(Cursor::new(Vec::new()));
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(xml_io)?;
            Ok(Self { writer })
        }

        pub fn into_string(self) -> Result<String, VatError> {
            let buf = self.writer.into_inner().into_inner();
            String::from_utf8(buf)
                .map_err(|e| VatError::unavailable(format!("XML UTF-8 error: {e}")))
        }

        pub fn start_element_with_attrs(
            &mut self,
            name: &str,
            attrs: &[(&str, &str)],
        ) -> Result<&mut Self, VatError> {
            let mut elem = BytesStart::new(name);
            for (k, v) in attrs {
                elem.push_attribute((*k, *v));
            }
            self.writer
                .write_event(Event::Start(elem))
                .map_err(xml_io)?;
            Ok(self)
        }

        pub fn start_element(&mut self, name: &str) -> Result<&mut Self, VatError> {
            self.start_element_with_attrs(name, &[])
        }

        pub fn empty_element(&mut self, name: &str) -> Result<&mut Self, VatError> {
            self.writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(xml_io)?;
            Ok(self)
        }

        pub fn end_element(&mut self, name: &str) -> Result<&mut Self, VatError> {
            self.writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(xml_io)?;
            Ok(self)
        }

        pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, VatError> {
            self.start_element(name)?;
            self.writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_io)?;
            self.end_element(name)
        }
    }

}
