use std::any::Any;
use std::cell::Cell;
use std::fmt;

use log::warn;

use crate::checks::Checks;
use crate::driver::{BindingSlot, Driver};
use crate::error::{Error, GlError, ResourceKind, Result};

/// OpenGL function context
///
/// Owns the driver and the validation policy shared by every wrapper call.
/// Owning objects keep an `Rc` to it so they can release their ids on drop.
pub struct Context {
    driver: Box<dyn Driver>,
    checks: Cell<Checks>,
}

impl Context {
    /// Wrap `driver` with the feature-selected [`Checks`]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::with_checks(driver, Checks::default())
    }

    pub fn with_checks(driver: impl Driver + 'static, checks: Checks) -> Self {
        Self {
            driver: Box::new(driver),
            checks: Cell::new(checks),
        }
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Concrete driver, e.g. `gl.native::<glow::Context>()` for draw calls
    pub fn native<D: Any>(&self) -> Option<&D> {
        self.driver.as_any().downcast_ref()
    }

    pub fn checks(&self) -> Checks {
        self.checks.get()
    }

    pub fn set_checks(&self, checks: Checks) {
        self.checks.set(checks);
    }

    /// Id currently held by `slot`
    pub fn bound(&self, slot: BindingSlot) -> u32 {
        self.driver.binding(slot)
    }

    pub(crate) fn require_not_null(
        &self,
        kind: ResourceKind,
        id: u32,
        op: &'static str,
    ) -> Result<()> {
        if self.checks().null_handles && id == 0 {
            return Err(Error::NullHandle { kind, op });
        }

        Ok(())
    }

    pub(crate) fn require_bound(
        &self,
        kind: ResourceKind,
        slot: BindingSlot,
        id: u32,
    ) -> Result<()> {
        if self.checks().bound_state {
            let bound = self.bound(slot);
            if bound != id {
                return Err(Error::NotBound {
                    kind,
                    id,
                    slot,
                    bound,
                });
            }
        }

        Ok(())
    }

    /// Report the pending driver error raised by `op`, if error checks are on
    pub fn check_error(&self, op: &'static str) -> Result<()> {
        if !self.checks().driver_errors {
            return Ok(());
        }

        match GlError::from_code(self.driver.get_error()) {
            Some(error) => {
                self.clear_errors();
                Err(Error::Driver { op, error })
            }
            None => Ok(()),
        }
    }

    /// Drain the driver error flags, logging what was pending
    pub fn clear_errors(&self) {
        while let Some(error) = GlError::from_code(self.driver.get_error()) {
            warn!("discarding pending driver error {:?}", error);
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("checks", &self.checks())
            .finish()
    }
}
