//! KML document layouts and their conversion into [`Sector`]s.

use kml::Kml;
use kml::types::{Element, Placemark};

use crate::error::SectorError;

use super::Sector;

/// How a region's KML file arranges its placemarks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Placemarks nested in folders at any depth, named by `<name>` (UK postcode sectors)
    NestedFolders,
    /// Placemarks directly under `<Document>`, named by their first `ExtendedData` value (US zipcodes)
    FlatExtendedData,
}

/// Parse KML markup into sectors according to `layout`
pub fn parse_markup(markup: &str, layout: Layout) -> Result<Vec<Sector>, SectorError> {
    let kml: Kml<f64> = markup
        .parse()
        .map_err(|e: kml::Error| SectorError::Parse(e.to_string()))?;
    parse_kml(kml, layout)
}

/// Convert an already parsed KML tree into sectors
pub fn parse_kml(kml: Kml<f64>, layout: Layout) -> Result<Vec<Sector>, SectorError> {
    let elements = document_elements(kml)?;

    let mut sectors = Vec::new();
    match layout {
        Layout::NestedFolders => collect_from_folders(elements, &mut sectors)?,
        Layout::FlatExtendedData => {
            for (position, element) in elements.into_iter().enumerate() {
                if let Kml::Placemark(placemark) = element {
                    let name = extended_data_name(&placemark)
                        .ok_or(SectorError::MissingName { position })?;
                    sectors.push(sector_from_placemark(name, placemark)?);
                }
            }
        }
    }

    Ok(sectors)
}

/// Children of the first `<Document>`, whether or not it sits inside a `<kml>` root
fn document_elements(kml: Kml<f64>) -> Result<Vec<Kml<f64>>, SectorError> {
    match kml {
        Kml::KmlDocument(root) => root
            .elements
            .into_iter()
            .find_map(|element| match element {
                Kml::Document { elements, .. } => Some(elements),
                _ => None,
            })
            .ok_or_else(|| {
                SectorError::InvalidDocument("KML file does not contain a <Document>".to_string())
            }),
        Kml::Document { elements, .. } => Ok(elements),
        _ => Err(SectorError::InvalidDocument(
            "not a KML document".to_string(),
        )),
    }
}

// Folder nesting differs between files, so the whole tree is searched
fn collect_from_folders(
    elements: Vec<Kml<f64>>,
    sectors: &mut Vec<Sector>,
) -> Result<(), SectorError> {
    for element in elements {
        match element {
            Kml::Folder { elements, .. } => collect_from_folders(elements, sectors)?,
            Kml::Placemark(placemark) => {
                let name = match (&placemark.name, &placemark.geometry) {
                    (Some(name), Some(_)) => name.trim().to_string(),
                    _ => continue,
                };
                sectors.push(sector_from_placemark(name, placemark)?);
            }
            _ => {}
        }
    }
    Ok(())
}

fn sector_from_placemark(name: String, placemark: Placemark<f64>) -> Result<Sector, SectorError> {
    // quick_collection converts the placemark geometry into geo types
    let geometry = kml::quick_collection(Kml::Placemark(placemark)).map_err(|e| SectorError::Geometry {
        name: name.clone(),
        reason: e.to_string(),
    })?;
    Ok(Sector::new(name, geometry))
}

/// Sector name held in the placemark's `ExtendedData`
///
/// Looks for `Data/value` first, then `SchemaData/SimpleData`, and only then
/// for any non-empty text, so a `<displayName>` label is never taken as the name.
fn extended_data_name(placemark: &Placemark<f64>) -> Option<String> {
    let extended_data = placemark
        .children
        .iter()
        .find(|child| child.name == "ExtendedData")?;

    let data_value = children_named(extended_data, "Data")
        .flat_map(|data| children_named(data, "value"))
        .find_map(own_text);
    let simple_data = || {
        children_named(extended_data, "SchemaData")
            .flat_map(|schema| children_named(schema, "SimpleData"))
            .find_map(own_text)
    };

    data_value
        .or_else(simple_data)
        .or_else(|| first_text(extended_data))
}

fn children_named<'a>(element: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> {
    element
        .children
        .iter()
        .filter(move |child| child.name == name)
}

fn own_text(element: &Element) -> Option<String> {
    let trimmed = element.content.as_deref()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_text(element: &Element) -> Option<String> {
    own_text(element).or_else(|| element.children.iter().find_map(first_text))
}
