use crate::error::ParseError;
use crate::pipeline::parse::RouteReader;
use crate::types::route::RawCoordinate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxReader;

fn is_vertex(name: &str) -> bool {
    name == "trkpt" || name == "rtept"
}

fn element_name(e: &BytesStart) -> Result<String, ParseError> {
    let name = e.name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

fn vertex_from(e: &BytesStart, index: usize) -> Result<RawCoordinate, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value =
            std::str::from_utf8(&attr.value).map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = value.parse().ok(),
            "lon" => lon = value.parse().ok(),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(RawCoordinate {
            lon,
            lat,
            elevation: None,
        }),
        _ => Err(ParseError::InvalidGpx(format!(
            "vertex {} has no valid lat/lon",
            index
        ))),
    }
}

impl RouteReader for GpxReader {
    fn read(&self, bytes: &[u8]) -> Result<Vec<RawCoordinate>, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut points = Vec::new();
        let mut current_point: Option<RawCoordinate> = None;
        let mut in_ele = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = element_name(&e)?;
                    if is_vertex(&name) {
                        current_point = Some(vertex_from(&e, points.len())?);
                    } else if current_point.is_some() {
                        in_ele = name == "ele";
                    }
                }
                Ok(Event::Empty(e)) => {
                    if is_vertex(&element_name(&e)?) {
                        points.push(vertex_from(&e, points.len())?);
                    }
                }
                Ok(Event::Text(e)) => {
                    if in_ele {
                        if let Some(point) = current_point.as_mut() {
                            let text = e
                                .unescape()
                                .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                            point.elevation = text.trim().parse().ok();
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    if is_vertex(name_str) {
                        if let Some(point) = current_point.take() {
                            points.push(point);
                        }
                    }
                    in_ele = false;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(points)
    }
}
