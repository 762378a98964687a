use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Inventory {
    pub boxes: Vec<String>,
    pub positions: Vec<String>,
    pub pieces: Vec<PieceEntry>,
    pub containers: Vec<ContainerEntry>,
}

#[derive(Deserialize, Debug)]
pub struct PieceEntry {
    pub part_number: String,
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ContainerEntry {
    pub id: ContainerKey,
    #[serde(rename = "box")]
    pub box_id: Option<String>,
    pub position: Option<String>,
    #[serde(default)]
    pub pieces: Vec<String>,
}

/// Fixtures write container ids either as `"c007"` or as a bare `7`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ContainerKey {
    Number(i64),
    Text(String),
}
