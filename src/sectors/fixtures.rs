//! Small KML documents in both layouts, for store and parser tests.

use std::path::Path;

use crate::kmz::{ArchiveCodec, KmzCodec};

/// Nested-folder layout: "AB1 0" x,y in [0,1], "AB1 1" x in [1,2] y in [0,1], "AB2 0" x,y in [2,3]
pub(crate) const UK_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Folder>
      <Folder>
        <Placemark>
          <name>AB1 0</name>
          <Polygon>
            <outerBoundaryIs>
              <LinearRing>
                <coordinates>0,0 1,0 1,1 0,1 0,0</coordinates>
              </LinearRing>
            </outerBoundaryIs>
          </Polygon>
        </Placemark>
      </Folder>
      <Placemark>
        <name>AB1 1</name>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <coordinates>1,0 2,0 2,1 1,1 1,0</coordinates>
            </LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </Placemark>
      <Placemark>
        <name>NO GEOMETRY</name>
      </Placemark>
    </Folder>
    <Placemark>
      <name>AB2 0</name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>2,2 3,2 3,3 2,3 2,2</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

/// Flat layout: "10001" around midtown Manhattan, "10002" around the Lower East Side
pub(crate) const US_KML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <ExtendedData>
        <SchemaData schemaUrl="#zcta">
          <SimpleData name="ZCTA5CE10">10001</SimpleData>
        </SchemaData>
      </ExtendedData>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>-74.01,40.74 -73.98,40.74 -73.98,40.76 -74.01,40.76 -74.01,40.74</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Placemark>
      <ExtendedData>
        <Data name="ZIP">
          <value>10002</value>
        </Data>
      </ExtendedData>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>-73.995,40.71 -73.975,40.71 -73.975,40.72 -73.995,40.72 -73.995,40.71</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"##;

/// Flat layout whose names sit after a `<displayName>` label or a sibling `<Data>` without a value
pub(crate) const US_KML_DISPLAY_NAME: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <ExtendedData>
        <Data name="ZIP">
          <displayName>Zip Code</displayName>
          <value>10003</value>
        </Data>
      </ExtendedData>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>-73.99,40.72 -73.98,40.72 -73.98,40.73 -73.99,40.73 -73.99,40.72</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Placemark>
      <ExtendedData>
        <SchemaData schemaUrl="#zcta">
          <SimpleData name="LABEL"></SimpleData>
          <SimpleData name="ZCTA5CE10">10004</SimpleData>
        </SchemaData>
      </ExtendedData>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>-74.02,40.69 -74.0,40.69 -74.0,40.71 -74.02,40.71 -74.02,40.69</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"##;

/// Flat layout with a placemark that has no ExtendedData
pub(crate) const US_KML_UNNAMED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>0,0 1,0 1,1 0,1 0,0</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

/// Placemark directly under the root, no Document
pub(crate) const MISSING_DOCUMENT_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Placemark>
    <name>orphan</name>
    <Point>
      <coordinates>0,0</coordinates>
    </Point>
  </Placemark>
</kml>"#;

/// Write `markup` as a KMZ file at `path`
pub(crate) fn write_kmz(path: &Path, markup: &str) {
    let bytes = KmzCodec
        .compress_markup_to_archive(markup)
        .unwrap_or_else(|e| panic!("failed to build KMZ fixture: {e}"));
    std::fs::write(path, bytes).unwrap_or_else(|e| panic!("failed to write KMZ fixture: {e}"));
}
