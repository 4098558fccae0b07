pub mod contacto;
pub mod orquestador;
pub mod resource;

pub use contacto::{ContactoSaveError, ContactoStore, ContactoView};
pub use orquestador::{OrquestadorState, OrquestadorStore};
pub use resource::{ResourceStore, StoreSnapshot};
