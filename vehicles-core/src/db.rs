//! Logic for interfacing with LMDB.

extern crate kn0sys_lmdb_rs as lmdb;

use lazy_static::lazy_static;
use lmdb::*;
use log::{
    error,
    info,
};
use serde::{
    de::DeserializeOwned,
    Serialize,
};
use sysinfo::System;

use crate::{
    error::VehiclesError,
    utils,
};

/// Ratio of map size to available memory is 20 percent
const MAP_SIZE_MEMORY_RATIO: f32 = 0.2;
/// Ratio of chunk size to available memory is 0.2 percent
const CHUNK_SIZE_MEMORY_RATIO: f32 = MAP_SIZE_MEMORY_RATIO * 0.01;
/// Chunks never shrink below 64 KiB
const MIN_CHUNK_SIZE: usize = 64 * 1024;
/// LMDB map sizes are kept page aligned
const PAGE_SIZE: u64 = 4096;

lazy_static! {
    /// The process wide environment. LMDB forbids opening the same
    ///
    /// environment twice from one process.
    pub static ref DATABASE_LOCK: DatabaseEnvironment = DatabaseEnvironment::open_for_release();
}

/// The database environment for handling primary database operations.
///
/// By default the database will be written to /home/user/.vehicles/{ENV}
pub struct DatabaseEnvironment {
    /// LMDB environment
    pub env: Environment,
    /// Handle of the default database
    pub handle: DbHandle,
}

impl DatabaseEnvironment {
    /// Opens environment in specified path. The map size defaults to 20 percent
    ///
    /// of available memory and can be set via the `LMDB_MAP_SIZE` environment variable.
    ///
    /// The path of the user can be set with `LMDB_USER`.
    pub fn open(env: &str) -> Result<Self, MdbError> {
        let s = System::new_all();
        let default_map_size: u64 =
            (s.available_memory() as f32 * MAP_SIZE_MEMORY_RATIO).floor() as u64;
        let env_map_size: u64 = match std::env::var("LMDB_MAP_SIZE") {
            Err(_) => default_map_size,
            Ok(size) => size.parse::<u64>().unwrap_or(default_map_size),
        };
        let env_map_size = (env_map_size / PAGE_SIZE).max(1) * PAGE_SIZE;
        info!("setting lmdb map size to: {}", env_map_size);
        let user: String = match std::env::var("LMDB_USER") {
            Err(_) => std::env::var("USER").unwrap_or(String::from("user")),
            Ok(user) => user,
        };
        info!("$LMDB_USER={}", user);
        let file_path: String = format!("/home/{}/.{}/{}", user, crate::APP_NAME, env);
        std::fs::create_dir_all(&file_path).map_err(|e| {
            error!("could not create {}: {}", file_path, e);
            MdbError::Panic
        })?;
        info!("excecuting lmdb open at {}", file_path);
        let env: Environment = EnvBuilder::new()
            .map_size(env_map_size)
            .open(&file_path, 0o777)?;
        let handle: DbHandle = env.get_default_db(DbFlags::empty())?;
        Ok(DatabaseEnvironment { env, handle })
    }

    /// Production data lives apart from development and test data.
    fn open_for_release() -> Self {
        let env = if utils::get_release_env() == utils::ReleaseEnvironment::Production {
            "lmdb"
        } else {
            "test-lmdb"
        };
        match DatabaseEnvironment::open(env) {
            Ok(db) => db,
            Err(e) => panic!("could not open LMDB environment {}: {:?}", env, e),
        }
    }

    /// Read key from the database. If it doesn't exist then
    ///
    /// an empty vector will be returned. Treat all empty vectors
    ///
    /// from database operations as missing values.
    pub fn read(e: &Environment, h: &DbHandle, k: &[u8]) -> Result<Vec<u8>, MdbError> {
        // don't try and read empty keys
        if k.is_empty() {
            error!("can't read empty key");
            return Err(MdbError::NotFound);
        }
        let reader: ReadonlyTransaction = e.get_reader()?;
        let db: Database = reader.bind(h);
        let mut result: Vec<u8> = Vec::new();
        for num_writes in 0..usize::MAX {
            let new_key = chunk_key(k, num_writes);
            let mut r = db.get::<Vec<u8>>(&new_key).unwrap_or_default();
            if r.is_empty() {
                break;
            }
            result.append(&mut r);
        }
        Ok(result)
    }

    /// Deletes a key/value pair and all of its chunks from the database
    pub fn delete(e: &Environment, h: &DbHandle, k: &[u8]) -> Result<(), MdbError> {
        if k.is_empty() {
            error!("can't delete empty key");
            return Err(MdbError::NotFound);
        }
        let txn = e.new_transaction()?;
        {
            let db: Database = txn.bind(h);
            for num_writes in 0..usize::MAX {
                let new_key = chunk_key(k, num_writes);
                let r = db.get::<Vec<u8>>(&new_key).unwrap_or_default();
                if r.is_empty() {
                    break;
                }
                db.del(&new_key)?;
            }
        }
        txn.commit()
    }
}

fn chunk_key(k: &[u8], n: usize) -> Vec<u8> {
    let mut new_key: Vec<u8> = k.to_vec();
    new_key.extend_from_slice(&n.to_be_bytes());
    new_key
}

/// Write chunks to the database. The chunk size is a fixed share
///
/// of available memory. Setting the map_size to a low value
///
/// will cause degraded performance. Old chunks are cleared in the same
///
/// transaction, readers see either the old value or the new one.
pub fn write_chunks(e: &Environment, h: &DbHandle, k: &[u8], v: &[u8]) -> Result<(), MdbError> {
    if k.is_empty() {
        error!("can't write empty key");
        return Err(MdbError::NotFound);
    }
    let mut s = System::new();
    s.refresh_memory();
    let chunk_size =
        ((s.available_memory() as f32 * CHUNK_SIZE_MEMORY_RATIO) as usize).max(MIN_CHUNK_SIZE);
    let txn = e.new_transaction()?;
    {
        let db: Database = txn.bind(h);
        for num_writes in 0..usize::MAX {
            let old_key = chunk_key(k, num_writes);
            let r = db.get::<Vec<u8>>(&old_key).unwrap_or_default();
            if r.is_empty() {
                break;
            }
            db.del(&old_key)?;
        }
        // write chunks until the last value which is smaller than chunk_size
        for (num_writes, chunk) in v.chunks(chunk_size).enumerate() {
            db.set(&chunk_key(k, num_writes), &chunk.to_vec())?;
        }
    }
    txn.commit()
}

/// Serialize `value` with bincode and store it under `k`, replacing
///
/// any previous value and its chunks.
pub fn put<T: Serialize>(k: &str, value: &T) -> Result<(), VehiclesError> {
    let db = &DATABASE_LOCK;
    let v = bincode::serialize(value)?;
    write_chunks(&db.env, &db.handle, k.as_bytes(), &v)?;
    Ok(())
}

/// Look up and deserialize the value stored under `k`.
pub fn get<T: DeserializeOwned>(k: &str) -> Result<Option<T>, VehiclesError> {
    let db = &DATABASE_LOCK;
    let r = DatabaseEnvironment::read(&db.env, &db.handle, k.as_bytes())?;
    if r.is_empty() {
        return Ok(None);
    }
    Ok(Some(bincode::deserialize(&r[..])?))
}

/// Remove the value stored under `k`.
pub fn remove(k: &str) -> Result<(), VehiclesError> {
    let db = &DATABASE_LOCK;
    DatabaseEnvironment::delete(&db.env, &db.handle, k.as_bytes())?;
    Ok(())
}
