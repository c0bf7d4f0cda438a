//! Shapefile reading and writing operations.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use shapefile::{
    dbase,
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
    Point, Polygon, Polyline, Reader, Shape, Writer,
};

/// Field names of a layer's dbase table, in file order.
///
/// `Record` itself is an unordered map, so the source field order has to
/// ride alongside the records for the output table to match its inputs.
pub(crate) fn read_field_order(path: &Path) -> Result<Vec<String>> {
    let table = dbase::Reader::from_path(path.with_extension("dbf"))
        .with_context(|| format!("[io::shp] Failed to open dbase table for {}", path.display()))?;
    Ok(table
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .filter(|name| name != "DeletionFlag")
        .collect())
}

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading feature from {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Reads a point layer and its field order; any other shape type in the
/// file is a hard error.
pub(crate) fn read_points(path: &Path) -> Result<(Vec<(Point, Record)>, Vec<String>)> {
    let points = read_shapefile(path)?
        .into_iter()
        .map(|(shape, record)| match shape {
            Shape::Point(p) => Ok((p, record)),
            other => bail!(
                "[io::shp] Expected points in {}, found {}",
                path.display(),
                other.shapetype()
            ),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((points, read_field_order(path)?))
}

/// Reads a polygon layer and its field order; any other shape type in the
/// file is a hard error.
pub(crate) fn read_polygons(path: &Path) -> Result<(Vec<(Polygon, Record)>, Vec<String>)> {
    let polygons = read_shapefile(path)?
        .into_iter()
        .map(|(shape, record)| match shape {
            Shape::Polygon(p) => Ok((p, record)),
            other => bail!(
                "[io::shp] Expected polygons in {}, found {}",
                path.display(),
                other.shapetype()
            ),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((polygons, read_field_order(path)?))
}

/// Reads a polyline layer and its field order; any other shape type in the
/// file is a hard error.
pub(crate) fn read_polylines(path: &Path) -> Result<(Vec<(Polyline, Record)>, Vec<String>)> {
    let polylines = read_shapefile(path)?
        .into_iter()
        .map(|(shape, record)| match shape {
            Shape::Polyline(p) => Ok((p, record)),
            other => bail!(
                "[io::shp] Expected polylines in {}, found {}",
                path.display(),
                other.shapetype()
            ),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((polylines, read_field_order(path)?))
}

/// Derives a dbase table layout from the first record of a layer, laying the
/// fields out in the given order.
///
/// Inputs are assumed schema-compatible; a field type this pipeline cannot
/// carry through is a hard error rather than a silently dropped column.
fn table_builder(first: &Record, fields: &[String]) -> Result<TableWriterBuilder> {
    let mut builder = TableWriterBuilder::new();
    for name in fields {
        let value = first
            .get(name)
            .ok_or_else(|| anyhow!("[io::shp] Field {name:?} missing from the first record"))?;
        let field_name = FieldName::try_from(name.as_str())
            .map_err(|e| anyhow!("[io::shp] Invalid dbase field name {name:?}: {e:?}"))?;
        builder = match value {
            FieldValue::Character(_) => builder.add_character_field(field_name, 254),
            FieldValue::Numeric(_) => builder.add_numeric_field(field_name, 24, 8),
            FieldValue::Float(_) => builder.add_float_field(field_name, 24, 8),
            FieldValue::Integer(_) => builder.add_integer_field(field_name),
            FieldValue::Logical(_) => builder.add_logical_field(field_name),
            FieldValue::Date(_) => builder.add_date_field(field_name),
            other => bail!("[io::shp] Unsupported dbase field type for {name:?}: {other:?}"),
        };
    }
    Ok(builder)
}

/// Writes a layer of (shape, record) features to `path`.
///
/// Field types come from the first feature's record; `fields` carries the
/// source layer's field order so the output table matches its inputs.
pub(crate) fn write_shapefile<S>(path: &Path, features: &[(S, Record)], fields: &[String]) -> Result<()>
where
    S: shapefile::record::EsriShape,
{
    let Some((_, first)) = features.first() else {
        bail!("[io::shp] Refusing to write an empty layer to {}", path.display());
    };

    let mut writer = Writer::from_path(path, table_builder(first, fields)?)
        .with_context(|| format!("[io::shp] Failed to create shapefile: {}", path.display()))?;
    for (shape, record) in features {
        writer
            .write_shape_and_record(shape, record)
            .with_context(|| format!("[io::shp] Failed to write feature to {}", path.display()))?;
    }
    Ok(())
}
