pub mod catalog;
pub mod export;
pub mod mod_fs;
pub mod mod_list;
pub mod mod_pack;
pub mod pack_lock;
pub mod pack_service;
pub mod registry;
pub mod transport;
pub mod version;
