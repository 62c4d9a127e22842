use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across systems. It uses an `Arc<RwLock<T>>` internally to manage access.
/// The world registry hands chunks out through this type, and chunks link to their
/// horizontal neighbors through the weak counterpart, [`MtWeakResource`], so that two
/// linked chunks never keep each other alive.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use voxel_engine::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
///
/// let weak = counter.downgrade();
/// assert!(weak.upgrade().is_some());
/// ```
///
/// # Poisoning
/// A lock poisoned by a panic on another holder is recovered rather than propagated.
/// Every mutation of the engine state is a plain field write, so the data behind a
/// poisoned lock is still consistent.
pub struct MtResource<T: Send + Sync> {
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    ///
    /// # Returns
    /// A new `MtResource` containing the provided value
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// # Returns
    /// A guard that provides read access to the contained value
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// # Returns
    /// A guard that provides mutable access to the contained value
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a non-owning handle to the same resource.
    pub fn downgrade(&self) -> MtWeakResource<T> {
        MtWeakResource {
            resource: Arc::downgrade(&self.resource),
        }
    }

    /// Returns `true` if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

/// A non-owning handle to an [`MtResource`].
///
/// Upgrading fails once every owning handle has been dropped, which is how a chunk
/// notices that a neighbor it was linked to has been discarded.
pub struct MtWeakResource<T: Send + Sync> {
    resource: Weak<RwLock<T>>,
}

impl<T: Send + Sync> MtWeakResource<T> {
    /// Attempts to recover an owning handle.
    ///
    /// # Returns
    /// `Some(MtResource)` while the resource is alive, `None` after it was dropped
    pub fn upgrade(&self) -> Option<MtResource<T>> {
        self.resource
            .upgrade()
            .map(|resource| MtResource { resource })
    }

    /// Returns `true` if this handle refers to the allocation owned by `other`.
    pub fn points_to(&self, other: &MtResource<T>) -> bool {
        std::ptr::eq(self.resource.as_ptr(), Arc::as_ptr(&other.resource))
    }
}

impl<T: Send + Sync> Clone for MtWeakResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
