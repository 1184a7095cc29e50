pub mod classify;
pub mod importer;
pub mod io;
pub mod manager;
pub mod prefab;
pub mod tasks;
pub mod url;

pub use classify::{MeshFlags, SceneMeshRule};
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader};
pub use importer::{AssetImporter, MemoryImporter, PrefabDecoder, ReaderImporter};
pub use manager::{AvatarAnimationResult, AvatarMesh, DUMMY_MESH_NAME, ResourceManager};
pub use prefab::{Prefab, PrefabAnimation, PrefabChannel, PrefabNode, SharedPrefab};
pub use tasks::{LoadSummary, MeshTask, TaskInfo, TaskQueue, TaskState};
pub use url::{ResourceUrl, split_url};
