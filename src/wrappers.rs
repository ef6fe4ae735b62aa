//! OpenGL object wrappers
//!
//! [`Handle`] is a copyable, nullable, non-owning view of an object id. Its
//! `A` parameter is a capability: [`Const`] views only query, [`Mut`] views
//! also change driver-side state. [`Object`] is the single owner of an id and
//! deletes it when dropped.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::rc::Rc;

use log::trace;

use crate::context::Context;
use crate::driver::BindingSlot;
use crate::error::{Error, ResourceKind, Result};

mod buffer;
pub use buffer::*;

mod shader;
pub use shader::*;

mod program;
pub use program::*;

mod texture;
pub use texture::*;

/// Kind of driver object, fixed at the type level
pub trait Resource: 'static {
    const KIND: ResourceKind;
    /// Human readable name including the subtype, e.g. `"vertex shader"`
    const NAME: &'static str;

    /// Ask the driver for a new id
    fn create(gl: &Context) -> Result<u32, String>;
    /// Release a non-null id
    fn delete(gl: &Context, id: u32);
}

/// Resource that occupies a binding slot of the context while active
pub trait Bindable: Resource {
    const SLOT: BindingSlot;

    /// Put `id` (possibly 0) in the binding slot
    fn bind_raw(gl: &Context, id: u32);
}

mod sealed {
    pub trait Sealed {}
}

/// Capability of a [`Handle`]
pub trait Access: sealed::Sealed + 'static {}

/// Read-only capability
#[derive(Debug)]
pub enum Const {}

/// Capability to change driver-side state
#[derive(Debug)]
pub enum Mut {}

impl sealed::Sealed for Const {}
impl sealed::Sealed for Mut {}
impl Access for Const {}
impl Access for Mut {}

/// Non-owning reference to a driver object
///
/// Never creates or deletes anything, and may outlive the object it names.
pub struct Handle<R: Resource, A: Access = Const> {
    id: u32,
    _marker: PhantomData<fn() -> (R, A)>,
}

impl<R: Resource, A: Access> Handle<R, A> {
    pub const NULL: Self = Self::from_id_unchecked(0);

    /// Reference an existing id, which must not be 0
    pub fn from_id(id: u32) -> Result<Self> {
        if id == 0 {
            return Err(Error::NullHandle {
                kind: R::KIND,
                op: "from id",
            });
        }

        Ok(Self::from_id_unchecked(id))
    }

    /// Reference `id` without checking it
    pub const fn from_id_unchecked(id: u32) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    pub fn is_some(&self) -> bool {
        self.id != 0
    }

    /// `None` for a null handle
    pub fn get(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Point at another id
    pub fn set(&mut self, id: u32) {
        self.id = id;
    }

    /// Point at nothing
    pub fn clear(&mut self) {
        self.id = 0;
    }

    pub fn as_const(&self) -> Handle<R, Const> {
        Handle::from_id_unchecked(self.id)
    }

    pub(crate) fn live(&self, gl: &Context, op: &'static str) -> Result<u32> {
        gl.require_not_null(R::KIND, self.id, op)?;
        Ok(self.id)
    }
}

impl<R: Bindable, A: Access> Handle<R, A> {
    /// Make this object the active one in its binding slot
    pub fn bind(&self, gl: &Context) -> Result<()> {
        trace!("binding {} {}", R::NAME, self.id);
        R::bind_raw(gl, self.id);
        gl.check_error("bind")
    }

    /// Empty this object's binding slot
    pub fn unbind(&self, gl: &Context) -> Result<()> {
        R::bind_raw(gl, 0);
        gl.check_error("unbind")
    }

    /// Whether the binding slot currently holds this object
    pub fn is_bound(&self, gl: &Context) -> bool {
        gl.bound(R::SLOT) == self.id
    }

    /// Bind until the returned guard drops, then restore the previous binding
    pub fn bind_scoped<'gl>(&self, gl: &'gl Context) -> Result<BindGuard<'gl, R>> {
        let previous = gl.bound(R::SLOT);
        self.bind(gl)?;
        Ok(BindGuard {
            gl,
            previous,
            _marker: PhantomData,
        })
    }
}

impl<R: Bindable> Handle<R, Mut> {
    /// Non-null and bound, as far as the active checks can tell
    pub(crate) fn active(&self, gl: &Context, op: &'static str) -> Result<u32> {
        let id = self.live(gl, op)?;
        gl.require_bound(R::KIND, R::SLOT, id)?;
        Ok(id)
    }
}

impl<R: Resource, A: Access> Clone for Handle<R, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource, A: Access> Copy for Handle<R, A> {}

impl<R: Resource, A: Access> Default for Handle<R, A> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<R: Resource, A: Access> PartialEq for Handle<R, A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<R: Resource, A: Access> Eq for Handle<R, A> {}

impl<R: Resource, A: Access> Hash for Handle<R, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl<R: Resource, A: Access> fmt::Debug for Handle<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handle<{}>({})", R::NAME, self.id)
    }
}

impl<R: Resource> From<Handle<R, Mut>> for Handle<R, Const> {
    fn from(handle: Handle<R, Mut>) -> Self {
        handle.as_const()
    }
}

/// Anything that names an object of kind `R`
pub trait AsHandle<R: Resource> {
    fn as_handle(&self) -> Handle<R, Const>;
}

impl<R: Resource, A: Access> AsHandle<R> for Handle<R, A> {
    fn as_handle(&self) -> Handle<R, Const> {
        self.as_const()
    }
}

impl<R: Resource> AsHandle<R> for Object<R> {
    fn as_handle(&self) -> Handle<R, Const> {
        self.handle.as_const()
    }
}

/// Restores a binding slot to its previous id when dropped
#[must_use = "the previous binding is restored when the guard drops"]
pub struct BindGuard<'gl, R: Bindable> {
    gl: &'gl Context,
    previous: u32,
    _marker: PhantomData<fn() -> R>,
}

impl<'gl, R: Bindable> BindGuard<'gl, R> {
    /// Id that will be restored
    pub fn previous(&self) -> u32 {
        self.previous
    }
}

impl<'gl, R: Bindable> Drop for BindGuard<'gl, R> {
    fn drop(&mut self) {
        R::bind_raw(self.gl, self.previous);
    }
}

/// Owner of a driver object, deleted when this handle is dropped
///
/// This keeps an RC reference to the context, so it is best used as a
/// long-lived handle. Moving transfers the id; there is no `Clone`.
pub struct Object<R: Resource> {
    gl: Rc<Context>,
    handle: Handle<R, Mut>,
}

impl<R: Resource> Object<R> {
    /// Create a new driver object
    pub fn create(gl: &Rc<Context>) -> Result<Self> {
        let id = R::create(gl).map_err(|message| Error::Create {
            kind: R::KIND,
            message,
        })?;
        trace!("created {} {}", R::NAME, id);
        Ok(Self::from_id(gl, id))
    }

    /// Own nothing yet
    pub fn null(gl: &Rc<Context>) -> Self {
        Self::from_id(gl, 0)
    }

    /// Take ownership of an existing id, which is not validated
    pub fn from_id(gl: &Rc<Context>, id: u32) -> Self {
        Self {
            gl: gl.clone(),
            handle: Handle::from_id_unchecked(id),
        }
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.gl
    }

    pub fn handle(&self) -> Handle<R, Const> {
        self.handle.as_const()
    }

    /// Delete the object if there is one; calling again does nothing
    pub fn destroy(&mut self) {
        if self.handle.is_null() {
            return;
        }

        trace!("deleting {} {}", R::NAME, self.handle.id());
        R::delete(&self.gl, self.handle.id());
        self.handle.clear();
    }

    /// Delete the current object, then own `id`
    pub fn reset_to(&mut self, id: u32) {
        self.destroy();
        self.handle.set(id);
    }

    /// Move the id into a new owner, leaving this one null
    pub fn take(&mut self) -> Self {
        let id = self.handle.id();
        self.handle.clear();
        Self::from_id(&self.gl, id)
    }

    /// Give up ownership without deleting
    pub fn into_raw(mut self) -> u32 {
        let id = self.handle.id();
        self.handle.clear();
        id
    }
}

impl<R: Resource> Drop for Object<R> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<R: Resource> Deref for Object<R> {
    type Target = Handle<R, Mut>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<R: Resource> AsRef<Handle<R, Mut>> for Object<R> {
    fn as_ref(&self) -> &Handle<R, Mut> {
        &self.handle
    }
}

impl<R: Resource> fmt::Debug for Object<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Object<{}>({})", R::NAME, self.handle.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Checks;
    use crate::driver::mock::{Call, MockDriver};

    fn context(checks: Checks) -> (MockDriver, Rc<Context>) {
        let driver = MockDriver::new();
        let gl = Rc::new(Context::with_checks(driver.clone(), checks));
        (driver, gl)
    }

    fn create_then_destroy_twice<R: Resource>() {
        let (driver, gl) = context(Checks::CHECKED);
        let mut owner = Object::<R>::create(&gl).unwrap();
        let id = owner.id();
        assert_ne!(id, 0, "{}", R::NAME);
        assert!(!owner.is_null());
        assert!(owner.is_some());

        owner.destroy();
        assert!(owner.is_null());
        owner.destroy();
        drop(owner);

        assert_eq!(driver.deletes(R::KIND, id), 1, "{}", R::NAME);
        assert_eq!(driver.live(R::KIND), 0);
    }

    #[test]
    fn every_kind_creates_and_deletes_once() {
        create_then_destroy_twice::<Buffer<Array>>();
        create_then_destroy_twice::<Buffer<ElementArray>>();
        create_then_destroy_twice::<Shader<Vertex>>();
        create_then_destroy_twice::<Shader<Fragment>>();
        create_then_destroy_twice::<Program>();
        create_then_destroy_twice::<Texture<Target2d>>();
    }

    #[test]
    fn null_objects_never_reach_the_driver() {
        let (driver, gl) = context(Checks::CHECKED);
        drop(ShaderProgram::null(&gl));
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn take_moves_the_id_and_nulls_the_source() {
        let (driver, gl) = context(Checks::CHECKED);
        let mut source = VertexShader::create(&gl).unwrap();
        let id = source.id();

        let target = source.take();
        assert!(source.is_null());
        assert_eq!(target.id(), id);

        drop(source);
        assert_eq!(driver.deletes(ResourceKind::Shader, id), 0);
        drop(target);
        assert_eq!(driver.deletes(ResourceKind::Shader, id), 1);
    }

    #[test]
    fn move_assignment_releases_the_previous_object() {
        let (driver, gl) = context(Checks::CHECKED);
        let mut a = ArrayBuffer::create(&gl).unwrap();
        let b = ArrayBuffer::create(&gl).unwrap();
        let (old, moved) = (a.id(), b.id());

        a = b;
        assert_eq!(a.id(), moved);
        assert_eq!(driver.deletes(ResourceKind::Buffer, old), 1);
        assert_eq!(driver.deletes(ResourceKind::Buffer, moved), 0);

        drop(a);
        assert_eq!(driver.deletes(ResourceKind::Buffer, moved), 1);
    }

    #[test]
    fn reset_to_releases_before_adopting() {
        let (driver, gl) = context(Checks::CHECKED);
        let mut owner = ArrayBuffer::create(&gl).unwrap();
        let old = owner.id();

        owner.reset_to(42);
        assert_eq!(owner.id(), 42);
        assert_eq!(driver.deletes(ResourceKind::Buffer, old), 1);
    }

    #[test]
    fn from_id_adopts_without_creating() {
        let (driver, gl) = context(Checks::CHECKED);
        let owner = ShaderProgram::from_id(&gl, 9);
        assert_eq!(owner.id(), 9);
        assert!(driver.calls().is_empty());

        drop(owner);
        assert_eq!(driver.calls(), vec![Call::Delete(ResourceKind::Program, 9)]);
    }

    #[test]
    fn into_raw_leaks_the_id() {
        let (driver, gl) = context(Checks::CHECKED);
        let owner = Texture2d::create(&gl).unwrap();
        let id = owner.into_raw();
        assert_eq!(driver.deletes(ResourceKind::Texture, id), 0);
        assert_eq!(driver.live(ResourceKind::Texture), 1);
    }

    #[test]
    fn refused_creation_is_an_error() {
        let (driver, gl) = context(Checks::CHECKED);
        driver.refuse_create(true);
        match ArrayBuffer::create(&gl) {
            Err(Error::Create { kind, .. }) => assert_eq!(kind, ResourceKind::Buffer),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn handles_behave_like_nullable_pointers() {
        let mut ptr: ArrayBufferRef = Handle::NULL;
        assert!(ptr.is_null());
        assert_eq!(ptr, Handle::default());
        assert_eq!(ptr.get(), None);

        ptr.set(5);
        let copy = ptr;
        assert_eq!(copy.id(), 5);
        assert_eq!(copy.get(), Some(ptr));

        let cptr: ArrayBufferCRef = ptr.into();
        assert_eq!(cptr.id(), 5);

        ptr.clear();
        assert_eq!(ptr, Handle::NULL);
        assert_eq!(copy.id(), 5);
    }

    #[test]
    fn checked_construction_rejects_zero() {
        assert!(ElementArrayBufferCRef::from_id(0).is_err());
        assert_eq!(ElementArrayBufferCRef::from_id(3).unwrap().id(), 3);
    }

    #[test]
    fn views_do_not_own() {
        let (driver, gl) = context(Checks::CHECKED);
        let owner = ArrayBuffer::create(&gl).unwrap();
        let view = owner.handle();
        drop(owner);

        // The view dangles but still carries the old id
        assert!(view.is_some());
        assert_eq!(driver.deletes(ResourceKind::Buffer, view.id()), 1);
    }

    #[test]
    fn scoped_binding_restores_previous() {
        let (driver, gl) = context(Checks::CHECKED);
        let first = ArrayBuffer::create(&gl).unwrap();
        let second = ArrayBuffer::create(&gl).unwrap();
        first.bind(&gl).unwrap();

        {
            let guard = second.bind_scoped(&gl).unwrap();
            assert_eq!(guard.previous(), first.id());
            assert!(second.is_bound(&gl));
        }

        assert!(first.is_bound(&gl));
        assert_eq!(driver.bound(BindingSlot::ArrayBuffer), first.id());
    }

    #[test]
    fn debug_names_the_subtype() {
        let handle: Texture2dCRef = Handle::from_id_unchecked(4);
        assert_eq!(format!("{:?}", handle), "Handle<2D texture>(4)");
    }
}
