//! Zero copy binary (de)serialization of data structures.
//!
//! Vectors of `Copy` data are dumped as their raw bytes.
//! Composite structures are stored as a directory of such flat files,
//! one per member, through the `Deconstruct`/`Reconstruct` traits.

use std::{
    fs::{metadata, File},
    io::{prelude::*, Result},
    mem,
    path::Path,
    slice,
};

pub trait DataBytes {
    fn data_bytes(&self) -> &[u8];
}

pub trait DataBytesMut {
    fn data_bytes_mut(&mut self) -> &mut [u8];
}

impl<T: Copy> DataBytes for [T] {
    fn data_bytes(&self) -> &[u8] {
        let num_bytes = self.len() * mem::size_of::<T>();
        unsafe { slice::from_raw_parts(self.as_ptr() as *const u8, num_bytes) }
    }
}

impl<T: Copy> DataBytes for Vec<T> {
    fn data_bytes(&self) -> &[u8] {
        self[..].data_bytes()
    }
}

impl<T: Copy> DataBytesMut for [T] {
    fn data_bytes_mut(&mut self) -> &mut [u8] {
        let num_bytes = self.len() * mem::size_of::<T>();
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr() as *mut u8, num_bytes) }
    }
}

impl<T: Copy> DataBytesMut for Vec<T> {
    fn data_bytes_mut(&mut self) -> &mut [u8] {
        self[..].data_bytes_mut()
    }
}

pub trait Store: DataBytes {
    fn write_to(&self, path: &Path) -> Result<()> {
        File::create(path)?.write_all(self.data_bytes())
    }
}

impl<T: DataBytes + ?Sized> Store for T {}

pub trait Load: DataBytesMut + Sized {
    fn new_with_bytes(num_bytes: usize) -> Self;

    fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let metadata = metadata(path.as_ref())?;
        let mut file = File::open(path)?;

        let mut object = Self::new_with_bytes(metadata.len() as usize);
        assert_eq!(metadata.len() as usize, object.data_bytes_mut().len());
        file.read_exact(object.data_bytes_mut())?;

        Ok(object)
    }
}

impl<T: Default + Copy> Load for Vec<T> {
    fn new_with_bytes(num_bytes: usize) -> Self {
        assert_eq!(num_bytes % mem::size_of::<T>(), 0);
        let num_elements = num_bytes / mem::size_of::<T>();
        (0..num_elements).map(|_| T::default()).collect()
    }
}

/// Structures which can be stored as a directory of flat member files.
pub trait Deconstruct {
    fn store_each(&self, store: &dyn Fn(&str, &dyn Store) -> Result<()>) -> Result<()>;

    fn deconstruct_to<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let path = dir.as_ref();
        std::fs::create_dir_all(path)?;
        self.store_each(&|name, object: &dyn Store| object.write_to(&path.join(name)))
    }
}

/// Helper to load member files from a directory during reconstruction.
#[derive(Debug)]
pub struct Loader<'a> {
    path: &'a Path,
}

impl<'a> Loader<'a> {
    pub fn load<T: Load, P: AsRef<Path>>(&self, filename: P) -> Result<T> {
        T::load_from(self.path.join(filename))
    }
}

/// Counterpart of `Deconstruct` for self contained structures.
pub trait Reconstruct: Sized {
    fn reconstruct_with(loader: Loader) -> Result<Self>;

    fn reconstruct_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::reconstruct_with(Loader { path: dir.as_ref() })
    }
}

/// Reconstruction for structures which borrow preexisting context.
/// The reconstructor value carries the borrows.
pub trait ReconstructPrepared<T: Sized>: Sized {
    fn reconstruct_with(self, loader: Loader) -> Result<T>;

    fn reconstruct_from<P: AsRef<Path>>(self, dir: P) -> Result<T> {
        self.reconstruct_with(Loader { path: dir.as_ref() })
    }
}
