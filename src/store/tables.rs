//! Table registry - closed set of tables the service knows about
//!
//! The legacy service dispatched on raw table-name strings with a `switch`
//! per call site. Here the known tables are a closed enum, each carrying its
//! real table name, primary-key column and (for `bodegas`) the declarative
//! field rename that reconciles the external payload convention with the
//! actual column name.

/// Primary-key column used for any table the registry does not know.
pub const DEFAULT_ID_FIELD: &str = "id";

/// A field rewrite applied to plain-object payloads before SQL is built.
///
/// `from` is copied to `to` when `to` is absent, and `from` is always
/// removed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRename {
    pub from: &'static str,
    pub to: &'static str,
}

/// Static description of one known table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMeta {
    /// Actual table name in the database
    pub table: &'static str,
    /// Primary-key column
    pub id_field: &'static str,
    /// Optional payload normalization rule
    pub rename: Option<FieldRename>,
}

/// The tables this service manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Bodegas,
    BodegaItems,
    Items,
    Categorias,
    Usuarios,
}

impl Table {
    /// All known tables, in registry order.
    pub const ALL: [Table; 5] = [
        Table::Bodegas,
        Table::BodegaItems,
        Table::Items,
        Table::Categorias,
        Table::Usuarios,
    ];

    /// Resolves a table name to a registry entry.
    ///
    /// # Returns
    /// * `Some(Table)` - the name is one of the five known tables
    /// * `None` - anything else
    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.iter().copied().find(|t| t.meta().table == name)
    }

    pub fn meta(&self) -> TableMeta {
        match self {
            Table::Bodegas => TableMeta {
                table: "bodegas",
                id_field: "id_bodega",
                // External callers send `usuario_id`; the column is `id_usuario`.
                rename: Some(FieldRename {
                    from: "usuario_id",
                    to: "id_usuario",
                }),
            },
            Table::BodegaItems => TableMeta {
                table: "bodega_items",
                id_field: "id_bodega_item",
                rename: None,
            },
            Table::Items => TableMeta {
                table: "items",
                id_field: "id_item",
                rename: None,
            },
            Table::Categorias => TableMeta {
                table: "categorias",
                id_field: "id_categoria",
                rename: None,
            },
            Table::Usuarios => TableMeta {
                table: "usuarios",
                id_field: "id_usuario",
                rename: None,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.meta().table
    }
}

/// Primary-key column for a table name, falling back to [`DEFAULT_ID_FIELD`]
/// for names the registry does not know.
pub fn id_field_for(table: &str) -> &'static str {
    Table::from_name(table)
        .map(|t| t.meta().id_field)
        .unwrap_or(DEFAULT_ID_FIELD)
}

/// Rename rule for a table name, if any.
pub fn rename_for(table: &str) -> Option<FieldRename> {
    Table::from_name(table).and_then(|t| t.meta().rename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tables_map_to_their_pk_column() {
        assert_eq!(id_field_for("bodegas"), "id_bodega");
        assert_eq!(id_field_for("bodega_items"), "id_bodega_item");
        assert_eq!(id_field_for("items"), "id_item");
        assert_eq!(id_field_for("categorias"), "id_categoria");
        assert_eq!(id_field_for("usuarios"), "id_usuario");
    }

    #[test]
    fn unknown_tables_fall_back_to_id() {
        assert_eq!(id_field_for("proveedores"), "id");
        assert_eq!(id_field_for(""), "id");
    }

    #[test]
    fn only_bodegas_carries_a_rename_rule() {
        let rule = rename_for("bodegas").unwrap();
        assert_eq!(rule.from, "usuario_id");
        assert_eq!(rule.to, "id_usuario");

        for table in Table::ALL {
            if table != Table::Bodegas {
                assert!(table.meta().rename.is_none(), "{:?}", table);
            }
        }
    }

    #[test]
    fn from_name_round_trips() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("not_a_table"), None);
    }
}
