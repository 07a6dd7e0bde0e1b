use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{Links, ListMeta};

/// Projection of one storage row into the public item shape.
///
/// Rows arrive as JSON objects keyed by attribute name and are deserialized
/// into the implementing type before projection.
pub trait ListRow: DeserializeOwned {
    type Attributes: Serialize;

    /// Returns the item id and its attributes.
    fn into_item(self) -> (String, Self::Attributes);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: &'static str,
    pub attributes: A,
}

/// `{data, links, meta}` envelope shared by every list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<A> {
    pub data: Vec<Item<A>>,
    pub links: Links,
    pub meta: ListMeta,
}

pub fn build_envelope<R: ListRow>(
    rows: Vec<R>,
    resource_type: &'static str,
    links: Links,
    meta: ListMeta,
) -> ListResponse<R::Attributes> {
    let data = rows
        .into_iter()
        .map(|row| {
            let (id, attributes) = row.into_item();
            Item { id, item_type: resource_type, attributes }
        })
        .collect();
    ListResponse { data, links, meta }
}
