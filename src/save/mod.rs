mod bridge;
mod codec;
mod model;
mod store;

pub use bridge::{keys, read_snapshot, snapshot_from_state, state_from_snapshot, write_snapshot};
pub use codec::{export_to_base64, import_from_base64, load_from_json_string, save_to_json_string};
pub use model::{SAVE_VERSION, SaveSnapshot};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};
