//! Resource Registry
//!
//! Per-kind definitions for the Management API resources: list endpoint,
//! envelope root, detail-key rule and display columns. The API is not
//! uniform about addressing (ids for storage resources, names for security
//! objects, name plus group for app servers), so the per-kind rules live
//! here rather than spread across call sites.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a `<kind>-default-list` envelope.
///
/// Every field the API may or may not send is optional; unknown fields are
/// kept so the raw entry survives into the describe view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uriref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupnameref: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListEntry {
    /// Entries without a nameref are never displayed.
    pub fn display_name(&self) -> Option<&str> {
        self.nameref.as_deref()
    }
}

/// How a resource addresses its per-item `properties` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKey {
    /// `idref` names the item (databases, forests).
    Id,
    /// `nameref` names the item (groups, users, roles).
    Name,
    /// `nameref` names the item; the detail is stored under `idref` when
    /// the entry carries one (hosts).
    NameStoredById,
    /// `nameref` names the item, `groupnameref` goes into the `group-id`
    /// query parameter; both are required (app servers).
    NameInGroup,
}

/// Entry field shown in a list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Name,
    Id,
    GroupName,
}

/// Column of a resource list table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub header: &'static str,
    pub field: EntryField,
    pub width: u16,
}

/// Static definition of one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct ResourceDef {
    /// URL path segment, e.g. `databases`.
    pub key: &'static str,
    pub display_name: &'static str,
    /// List endpoint path including its query string. The databases list is
    /// the one endpoint called without `format=json`.
    pub list_path: &'static str,
    /// Root field of the list envelope, e.g. `database-default-list`.
    pub envelope_root: &'static str,
    pub detail_key: DetailKey,
    pub columns: &'static [ColumnDef],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Database,
    Forest,
    Server,
    Group,
    Host,
    User,
    Role,
}

const NAME_COLUMN: ColumnDef = ColumnDef {
    header: "Name",
    field: EntryField::Name,
    width: 45,
};

const ID_COLUMN: ColumnDef = ColumnDef {
    header: "ID",
    field: EntryField::Id,
    width: 30,
};

const GROUP_COLUMN: ColumnDef = ColumnDef {
    header: "Group",
    field: EntryField::GroupName,
    width: 30,
};

static DATABASE_DEF: ResourceDef = ResourceDef {
    key: "databases",
    display_name: "Databases",
    list_path: "/manage/v2/databases",
    envelope_root: "database-default-list",
    detail_key: DetailKey::Id,
    columns: &[NAME_COLUMN, ID_COLUMN],
};

static FOREST_DEF: ResourceDef = ResourceDef {
    key: "forests",
    display_name: "Forests",
    list_path: "/manage/v2/forests?format=json",
    envelope_root: "forest-default-list",
    detail_key: DetailKey::Id,
    columns: &[NAME_COLUMN, ID_COLUMN],
};

static SERVER_DEF: ResourceDef = ResourceDef {
    key: "servers",
    display_name: "App Servers",
    list_path: "/manage/v2/servers?format=json",
    envelope_root: "server-default-list",
    detail_key: DetailKey::NameInGroup,
    columns: &[NAME_COLUMN, GROUP_COLUMN],
};

static GROUP_DEF: ResourceDef = ResourceDef {
    key: "groups",
    display_name: "Groups",
    list_path: "/manage/v2/groups?format=json",
    envelope_root: "group-default-list",
    detail_key: DetailKey::Name,
    columns: &[NAME_COLUMN],
};

static HOST_DEF: ResourceDef = ResourceDef {
    key: "hosts",
    display_name: "Hosts",
    list_path: "/manage/v2/hosts?format=json",
    envelope_root: "host-default-list",
    detail_key: DetailKey::NameStoredById,
    columns: &[NAME_COLUMN, ID_COLUMN],
};

static USER_DEF: ResourceDef = ResourceDef {
    key: "users",
    display_name: "Users",
    list_path: "/manage/v2/users?format=json",
    envelope_root: "user-default-list",
    detail_key: DetailKey::Name,
    columns: &[NAME_COLUMN],
};

static ROLE_DEF: ResourceDef = ResourceDef {
    key: "roles",
    display_name: "Roles",
    list_path: "/manage/v2/roles?format=json",
    envelope_root: "role-default-list",
    detail_key: DetailKey::Name,
    columns: &[NAME_COLUMN],
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Database,
        ResourceKind::Forest,
        ResourceKind::Server,
        ResourceKind::Group,
        ResourceKind::Host,
        ResourceKind::User,
        ResourceKind::Role,
    ];

    /// The six resources whose list fetches gate the combined dashboard
    /// state. Hosts load alongside them but report in their own section.
    pub const AGGREGATED: [ResourceKind; 6] = [
        ResourceKind::Database,
        ResourceKind::Forest,
        ResourceKind::Server,
        ResourceKind::Group,
        ResourceKind::User,
        ResourceKind::Role,
    ];

    /// Fixed order of the combined error line: the prefixed resources
    /// first, the unprefixed databases error last.
    pub const ERROR_ORDER: [ResourceKind; 6] = [
        ResourceKind::Forest,
        ResourceKind::Server,
        ResourceKind::Group,
        ResourceKind::User,
        ResourceKind::Role,
        ResourceKind::Database,
    ];

    pub fn def(self) -> &'static ResourceDef {
        match self {
            ResourceKind::Database => &DATABASE_DEF,
            ResourceKind::Forest => &FOREST_DEF,
            ResourceKind::Server => &SERVER_DEF,
            ResourceKind::Group => &GROUP_DEF,
            ResourceKind::Host => &HOST_DEF,
            ResourceKind::User => &USER_DEF,
            ResourceKind::Role => &ROLE_DEF,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.def().display_name
    }

    /// Prefix attached to this resource's message in the combined error
    /// line. Databases historically reported unprefixed.
    pub fn error_label(self) -> Option<&'static str> {
        match self {
            ResourceKind::Forest => Some("Forests"),
            ResourceKind::Server => Some("Servers"),
            ResourceKind::Group => Some("Groups"),
            ResourceKind::User => Some("Users"),
            ResourceKind::Role => Some("Roles"),
            ResourceKind::Database | ResourceKind::Host => None,
        }
    }

    /// Detail-endpoint path for one entry, `None` when the entry lacks the
    /// key fields this kind requires (such entries are listed but never
    /// fetched).
    pub fn detail_path(self, entry: &ListEntry) -> Option<String> {
        let def = self.def();
        match def.detail_key {
            DetailKey::Id => {
                let id = entry.idref.as_deref()?;
                Some(format!(
                    "/manage/v2/{}/{}/properties?format=json",
                    def.key,
                    urlencoding::encode(id)
                ))
            }
            DetailKey::Name | DetailKey::NameStoredById => {
                let name = entry.nameref.as_deref()?;
                Some(format!(
                    "/manage/v2/{}/{}/properties?format=json",
                    def.key,
                    urlencoding::encode(name)
                ))
            }
            DetailKey::NameInGroup => {
                let name = entry.nameref.as_deref()?;
                let group = entry.groupnameref.as_deref()?;
                Some(format!(
                    "/manage/v2/{}/{}/properties?group-id={}&format=json",
                    def.key,
                    urlencoding::encode(name),
                    urlencoding::encode(group)
                ))
            }
        }
    }

    /// Key under which a successful detail lands in the details map.
    /// `None` exactly when [`detail_path`](Self::detail_path) is `None`.
    pub fn detail_store_key(self, entry: &ListEntry) -> Option<String> {
        match self.def().detail_key {
            DetailKey::Id => entry.idref.clone(),
            DetailKey::Name => entry.nameref.clone(),
            DetailKey::NameStoredById => {
                let name = entry.nameref.as_ref()?;
                Some(entry.idref.clone().unwrap_or_else(|| name.clone()))
            }
            DetailKey::NameInGroup => {
                entry.groupnameref.as_ref()?;
                entry.nameref.clone()
            }
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.def().key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(nameref: Option<&str>, idref: Option<&str>, groupnameref: Option<&str>) -> ListEntry {
        ListEntry {
            nameref: nameref.map(str::to_string),
            idref: idref.map(str::to_string),
            uriref: None,
            groupnameref: groupnameref.map(str::to_string),
            extra: Map::new(),
        }
    }

    #[test]
    fn database_detail_path_uses_idref() {
        let e = entry(Some("Documents"), Some("doc-123"), None);
        assert_eq!(
            ResourceKind::Database.detail_path(&e).unwrap(),
            "/manage/v2/databases/doc-123/properties?format=json"
        );
        assert_eq!(
            ResourceKind::Database.detail_store_key(&e).unwrap(),
            "doc-123"
        );
    }

    #[test]
    fn database_without_idref_has_no_detail() {
        let e = entry(Some("Documents"), None, None);
        assert_eq!(ResourceKind::Database.detail_path(&e), None);
        assert_eq!(ResourceKind::Database.detail_store_key(&e), None);
    }

    #[test]
    fn server_detail_path_carries_group_query() {
        let e = entry(Some("Admin"), None, Some("Default"));
        assert_eq!(
            ResourceKind::Server.detail_path(&e).unwrap(),
            "/manage/v2/servers/Admin/properties?group-id=Default&format=json"
        );
        assert_eq!(ResourceKind::Server.detail_store_key(&e).unwrap(), "Admin");
    }

    #[test]
    fn server_requires_both_name_and_group() {
        let e = entry(Some("Admin"), None, None);
        assert_eq!(ResourceKind::Server.detail_path(&e), None);
        assert_eq!(ResourceKind::Server.detail_store_key(&e), None);

        let e = entry(None, None, Some("Default"));
        assert_eq!(ResourceKind::Server.detail_path(&e), None);
    }

    #[test]
    fn host_fetches_by_name_but_stores_by_id() {
        let e = entry(Some("ml-node-1"), Some("host-9"), None);
        assert_eq!(
            ResourceKind::Host.detail_path(&e).unwrap(),
            "/manage/v2/hosts/ml-node-1/properties?format=json"
        );
        assert_eq!(ResourceKind::Host.detail_store_key(&e).unwrap(), "host-9");

        // Without an idref the name doubles as the storage key.
        let e = entry(Some("ml-node-1"), None, None);
        assert_eq!(
            ResourceKind::Host.detail_store_key(&e).unwrap(),
            "ml-node-1"
        );
    }

    #[test]
    fn detail_paths_encode_special_characters() {
        let e = entry(Some("App Server"), None, Some("My Group"));
        assert_eq!(
            ResourceKind::Server.detail_path(&e).unwrap(),
            "/manage/v2/servers/App%20Server/properties?group-id=My%20Group&format=json"
        );
    }

    #[test]
    fn databases_list_omits_format_query() {
        assert_eq!(
            ResourceKind::Database.def().list_path,
            "/manage/v2/databases"
        );
        for kind in ResourceKind::ALL {
            if kind != ResourceKind::Database {
                assert!(kind.def().list_path.ends_with("?format=json"));
            }
        }
    }

    #[test]
    fn entry_keeps_unknown_fields() {
        let e: ListEntry = serde_json::from_value(serde_json::json!({
            "nameref": "Documents",
            "idref": "doc-123",
            "kindref": "mixed"
        }))
        .unwrap();
        assert_eq!(e.display_name(), Some("Documents"));
        assert_eq!(
            e.extra.get("kindref").and_then(|v| v.as_str()),
            Some("mixed")
        );
    }
}
