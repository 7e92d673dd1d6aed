//! Conversion between tables and hierarchical documents.
//!
//! Encoding is strict: every record carries one leaf per column, in column
//! order, with null values as empty leaves. Decoding is lenient because a
//! transform template may add or drop leaves per record.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::model::{CellType, CellValue, Column, FormatPolicy, Table};

use super::{decode_name, encode_name, Document, Element};

/// Root element name of an encoded table
pub const ROOT_NAME: &str = "NewDataSet";

/// Record element name used when a table has no name
pub const DEFAULT_TABLE_NAME: &str = "Table";

/// Encode a table as `<NewDataSet><{table}><{column}>text</{column}>...`
pub fn encode(table: &Table, policy: &FormatPolicy) -> Document {
    let table_name = if table.name.trim().is_empty() {
        DEFAULT_TABLE_NAME
    } else {
        table.name.as_str()
    };
    let record_name = encode_name(table_name);
    let leaf_names: Vec<_> = table.columns.iter().map(|c| encode_name(&c.name)).collect();

    let mut root = Element::new(ROOT_NAME);
    for row in &table.rows {
        let mut record = Element::new(record_name.to_string());
        for (idx, leaf_name) in leaf_names.iter().enumerate() {
            let value = row.get(idx).unwrap_or(&CellValue::Null);
            record
                .children
                .push(Element::leaf(leaf_name.to_string(), policy.format(value)));
        }
        root.children.push(record);
    }

    Document::new(root)
}

/// Decode a document into a string-typed table.
///
/// Records are the root's child elements sharing the first child's name;
/// columns are the first record's attributes followed by its distinct leaf
/// names. A root whose children are all plain leaves is read as a single
/// record, unless they repeat one name, in which case each leaf is a record
/// of one column. A root holding only text is a single cell.
pub fn decode(doc: &Document) -> Table {
    let root = &doc.root;
    if root.is_leaf() && root.text.is_some() {
        // a bare text root, such as a wrapped opaque payload, is one cell
        let name = decode_name(&root.name);
        let mut table = Table::new(name.clone(), vec![Column::new(name)]);
        table.add_row(vec![leaf_value(root)]);
        return table;
    }

    let as_list = is_leaf_list(root);
    let records: Vec<&Element> = if !as_list && is_single_record(root) {
        vec![root]
    } else {
        match root.children.first() {
            Some(first) => {
                let records: Vec<_> = root
                    .children
                    .iter()
                    .filter(|c| c.name == first.name)
                    .collect();
                let skipped = root.children.len() - records.len();
                if skipped > 0 {
                    log::warn!(
                        "Ignoring {} element(s) not named {} under {}",
                        skipped,
                        first.name,
                        root.name
                    );
                }
                records
            }
            None => Vec::new(),
        }
    };

    let Some(first) = records.first() else {
        return Table::new(decode_name(&root.name), Vec::new());
    };

    let mut duplicates = 0usize;
    let mut records: Vec<IndexMap<&str, CellValue>> = records
        .iter()
        .map(|record| record_fields(record, as_list, &mut duplicates))
        .collect();

    let column_names: Vec<&str> = records[0].keys().copied().collect();
    let columns = column_names
        .iter()
        .map(|name| Column::new(decode_name(name)))
        .collect();
    let mut table = Table::new(decode_name(&first.name), columns);

    let mut missing = 0usize;
    let mut extra = 0usize;
    for fields in &mut records {
        let cells = column_names
            .iter()
            .map(|name| {
                fields.swap_remove(name).unwrap_or_else(|| {
                    missing += 1;
                    CellValue::Null
                })
            })
            .collect();
        extra += fields.len();
        table.add_row(cells);
    }

    if duplicates > 0 {
        log::warn!(
            "Kept the first of {} repeated leaves in records of {}",
            duplicates,
            table.name
        );
    }
    if missing > 0 || extra > 0 {
        log::debug!(
            "Decoded {} records of {} with {} missing and {} extra fields",
            table.row_count(),
            table.name,
            missing,
            extra
        );
    }

    table
}

/// Decode a document, then give columns named in `schema` their declared
/// type and parse their values with the policy.
pub fn decode_with_schema(doc: &Document, schema: &[Column], policy: &FormatPolicy) -> Table {
    let mut table = decode(doc);

    for declared in schema.iter().filter(|c| c.cell_type != CellType::String) {
        let Some(idx) = table.column_index(&declared.name) else {
            continue;
        };
        table.columns[idx].cell_type = declared.cell_type;
        for row in &mut table.rows {
            let Some(cell) = row.cells.get_mut(idx) else {
                continue;
            };
            let parsed = match cell {
                CellValue::String(text) => policy.parse(text, declared.cell_type),
                _ => continue,
            };
            *cell = parsed;
        }
    }

    table
}

fn is_single_record(root: &Element) -> bool {
    !root.children.is_empty() && root.children.iter().all(Element::is_leaf)
}

/// Several leaves, all with the same name
fn is_leaf_list(root: &Element) -> bool {
    root.children.len() > 1
        && is_single_record(root)
        && root.children.iter().all(|c| c.name == root.children[0].name)
}

/// Field values of one record by element name: attributes, then leaves.
/// A record from a leaf list is its own single field.
fn record_fields<'a>(
    record: &'a Element,
    as_list: bool,
    duplicates: &mut usize,
) -> IndexMap<&'a str, CellValue> {
    let mut fields = IndexMap::new();
    if as_list {
        fields.insert(record.name.as_str(), leaf_value(record));
        return fields;
    }

    for (name, value) in &record.attributes {
        fields.insert(name.as_str(), text_value(value));
    }
    for leaf in &record.children {
        match fields.entry(leaf.name.as_str()) {
            Entry::Occupied(_) => *duplicates += 1,
            Entry::Vacant(entry) => {
                entry.insert(leaf_value(leaf));
            }
        }
    }
    fields
}

fn leaf_value(leaf: &Element) -> CellValue {
    text_value(leaf.text())
}

fn text_value(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn orders() -> Table {
        let mut table = Table::new(
            "Orders",
            vec![
                Column::with_type("Id", CellType::Int),
                Column::new("Customer Name"),
                Column::with_type("Shipped", CellType::DateTime),
                Column::with_type("Total", CellType::Float),
            ],
        );
        let shipped =
            NaiveDateTime::parse_from_str("2024-05-02 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        table.add_row(vec![1i64.into(), "Ada".into(), shipped.into(), 12.5.into()]);
        table.add_row(vec![2i64.into(), "Grace".into(), CellValue::Null, 7.0.into()]);
        table
    }

    #[test]
    fn test_encode_shape() {
        let doc = encode(&orders(), &FormatPolicy::invariant());
        assert_eq!(doc.root.name, ROOT_NAME);
        assert_eq!(doc.root.children.len(), 2);

        let second = &doc.root.children[1];
        assert_eq!(second.name, "Orders");
        let names: Vec<_> = second.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Customer_x0020_Name", "Shipped", "Total"]);
        // null renders as an empty leaf, not a missing one
        assert_eq!(second.children[2].text, None);
        assert_eq!(second.children[3].text(), "7");
    }

    #[test]
    fn test_round_trip_through_xml() {
        let policy = FormatPolicy::invariant();
        let table = orders();
        let xml = encode(&table, &policy).to_xml().unwrap();
        let doc = Document::parse_xml(&xml).unwrap();

        let decoded = decode_with_schema(&doc, &table.columns, &policy);
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_untyped_decode_is_text() {
        let doc = encode(&orders(), &FormatPolicy::invariant());
        let decoded = decode(&doc);
        assert_eq!(decoded.name, "Orders");
        assert_eq!(decoded.columns[1], Column::new("Customer Name"));
        assert_eq!(decoded.rows[0].cells[2], CellValue::from("2024-05-02T14:00:00"));
        assert_eq!(decoded.rows[1].cells[2], CellValue::Null);
    }

    #[test]
    fn test_decode_tolerates_leaf_drift() {
        let doc = Document::parse_xml(
            "<Root><Item><A>1</A><B>x</B></Item><Item><A>2</A><C>extra</C></Item><Other><A>9</A></Other></Root>",
        )
        .unwrap();
        let table = decode(&doc);

        assert_eq!(table.column_names(), vec!["A", "B"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells, vec![CellValue::from("2"), CellValue::Null]);
    }

    #[test]
    fn test_decode_empty_document() {
        let table = decode(&Document::new(Element::new(ROOT_NAME)));
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_decode_single_record_root() {
        let doc = Document::parse_xml("<Orders><Id>5</Id><Name>Ada</Name></Orders>").unwrap();
        let table = decode(&doc);
        assert_eq!(table.name, "Orders");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_names(), vec!["Id", "Name"]);
    }

    #[test]
    fn test_decode_attribute_records() {
        let doc =
            Document::parse_xml(r#"<Export><Order id="1"/><Order id="2" note="late"/></Export>"#)
                .unwrap();
        let table = decode(&doc);
        assert_eq!(table.name, "Order");
        assert_eq!(table.column_names(), vec!["id"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells, vec![CellValue::from("2")]);
    }

    #[test]
    fn test_decode_attributes_before_leaves() {
        let doc = Document::parse_xml(
            r#"<Rows><Row key="a"><Value>1</Value></Row><Row key="b"><Value>2</Value></Row></Rows>"#,
        )
        .unwrap();
        let table = decode(&doc);
        assert_eq!(table.column_names(), vec!["key", "Value"]);
        assert_eq!(
            table.rows[1].cells,
            vec![CellValue::from("b"), CellValue::from("2")]
        );
    }

    #[test]
    fn test_decode_leaf_list() {
        let doc = Document::parse_xml("<List><Item>a</Item><Item>b</Item><Item/></List>").unwrap();
        let table = decode(&doc);
        assert_eq!(table.name, "Item");
        assert_eq!(table.column_names(), vec!["Item"]);
        let values: Vec<_> = table.rows.iter().map(|r| r.cells[0].clone()).collect();
        assert_eq!(
            values,
            vec![CellValue::from("a"), CellValue::from("b"), CellValue::Null]
        );
    }

    #[test]
    fn test_decode_text_root() {
        let doc = Document::new(Element::leaf("data", "a,b\n1,2"));
        let table = decode(&doc);
        assert_eq!(table.column_names(), vec!["data"]);
        assert_eq!(table.rows[0].cells[0], CellValue::from("a,b\n1,2"));
    }

    #[test]
    fn test_unnamed_table_gets_default_record_name() {
        let mut table = Table::new("", vec![Column::new("a")]);
        table.add_row(vec!["1".into()]);
        let doc = encode(&table, &FormatPolicy::invariant());
        assert_eq!(doc.root.children[0].name, DEFAULT_TABLE_NAME);
    }
}
