//=========================================================================
// Resize Coordinator
//=========================================================================
//
// Keeps camera projections and surface sizes in step with the viewport.
//
// One viewport notification becomes one `ResizePlan`, computed in full
// before anything is touched, then applied to the primary camera, the
// selector's surface and (when enabled) the spectator in one go.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::display::{Eye, EyeParameters, HeadMountedDisplay};
use crate::core::render::{RenderPath, RenderPathSelector};
use crate::core::scene::Camera;
use crate::core::spectator::SpectatorCoordinator;

//=== ResizePlan ==========================================================

/// Everything one viewport change applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    pub primary_aspect: f32,
    pub surface_size: (u32, u32),
    /// Aspect and surface size for the spectator, when it is enabled.
    pub spectator: Option<(f32, (u32, u32))>,
}

//=== ResizeCoordinator ===================================================

#[derive(Debug, Clone, Copy)]
pub struct ResizeCoordinator {
    default_eye: (u32, u32),
}

impl ResizeCoordinator {
    /// Per-eye size assumed when a presenting device reports nothing usable.
    pub const DEFAULT_EYE_SIZE: (u32, u32) = (1080, 1200);

    pub fn new(default_eye: (u32, u32)) -> Self {
        Self { default_eye }
    }

    /// Computes the plan for a `width` × `height` viewport.
    ///
    /// Returns `None` for degenerate sizes.
    pub fn plan(
        &self,
        width: u32,
        height: u32,
        selector: &RenderPathSelector,
        spectator_enabled: bool,
    ) -> Option<ResizePlan> {
        if width == 0 || height == 0 {
            warn!(target: "stage::resize", "Ignoring zero-sized viewport {}x{}", width, height);
            return None;
        }

        let aspect = width as f32 / height as f32;
        let surface_size = match (selector.path(), selector.device()) {
            (RenderPath::Hmd, Some(device)) if device.is_presenting() => {
                self.stereo_size(&**device)
            }
            _ => (width, height),
        };

        Some(ResizePlan {
            primary_aspect: aspect,
            surface_size,
            spectator: spectator_enabled.then_some((aspect, (width, height))),
        })
    }

    /// Side-by-side size for both eyes.
    fn stereo_size(&self, device: &dyn HeadMountedDisplay) -> (u32, u32) {
        let left = self.eye_size(device.eye_parameters(Eye::Left));
        let right = self.eye_size(device.eye_parameters(Eye::Right));
        (left.0.max(right.0) * 2, left.1.max(right.1))
    }

    fn eye_size(&self, params: Option<EyeParameters>) -> (u32, u32) {
        match params {
            Some(eye) if eye.render_width > 0 && eye.render_height > 0 => {
                (eye.render_width, eye.render_height)
            }
            _ => {
                debug!(
                    target: "stage::resize",
                    "Eye parameters unavailable, assuming {}x{}",
                    self.default_eye.0,
                    self.default_eye.1
                );
                self.default_eye
            }
        }
    }

    /// Plans and applies one viewport change.
    pub fn on_viewport_change(
        &self,
        width: u32,
        height: u32,
        camera: &mut Camera,
        selector: &mut RenderPathSelector,
        spectator: &mut SpectatorCoordinator,
    ) -> Option<ResizePlan> {
        let plan = self.plan(width, height, selector, spectator.is_enabled())?;

        camera.set_aspect(plan.primary_aspect);
        selector.resize(plan.surface_size.0, plan.surface_size.1);
        if let Some((aspect, (w, h))) = plan.spectator {
            spectator.apply_viewport(aspect, w, h);
        }

        debug!(target: "stage::resize", "Viewport {}x{} applied: {:?}", width, height, plan);
        Some(plan)
    }
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EYE_SIZE)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::{DiscoveryOutcome, DisplayHandle, SimulatedDisplay};
    use crate::core::render::{CameraView, RenderSurface, SurfaceRole};
    use crate::core::scene::SceneRoot;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    struct PlainSurface((u32, u32));

    impl RenderSurface for PlainSurface {
        fn role(&self) -> SurfaceRole {
            SurfaceRole::Primary
        }
        fn size(&self) -> (u32, u32) {
            self.0
        }
        fn set_size(&mut self, width: u32, height: u32) {
            self.0 = (width, height);
        }
        fn draw(&mut self, _scene: &SceneRoot, _views: &[CameraView]) {}
    }

    fn selector_with(outcome: DiscoveryOutcome) -> RenderPathSelector {
        let mut selector = RenderPathSelector::new(Box::new(PlainSurface((1, 1))), 1.7);
        selector.resolve(&outcome, &mut Camera::default());
        selector
    }

    fn presenting(display: SimulatedDisplay) -> RenderPathSelector {
        let device: DisplayHandle = Rc::new(display);
        device.request_present().unwrap();
        selector_with(DiscoveryOutcome::Found(device))
    }

    //=====================================================================
    // Planning Tests
    //=====================================================================

    #[test]
    fn zero_sizes_are_ignored() {
        let resize = ResizeCoordinator::default();
        let selector = selector_with(DiscoveryOutcome::NotFound);

        assert!(resize.plan(0, 600, &selector, false).is_none());
        assert!(resize.plan(800, 0, &selector, true).is_none());
    }

    #[test]
    fn fallback_uses_raw_viewport() {
        let resize = ResizeCoordinator::default();
        let selector = selector_with(DiscoveryOutcome::NotFound);

        let plan = resize.plan(1280, 720, &selector, false).unwrap();

        assert_relative_eq!(plan.primary_aspect, 1280.0 / 720.0);
        assert_eq!(plan.surface_size, (1280, 720));
        assert!(plan.spectator.is_none());
    }

    #[test]
    fn presenting_hmd_uses_per_eye_size() {
        let resize = ResizeCoordinator::default();
        let selector = presenting(SimulatedDisplay::new("sim").with_eye_size(Some((1512, 1680))));

        let plan = resize.plan(800, 600, &selector, false).unwrap();

        assert_eq!(plan.surface_size, (1512 * 2, 1680));
        assert_relative_eq!(plan.primary_aspect, 800.0 / 600.0);
    }

    #[test]
    fn missing_eye_parameters_use_default() {
        let resize = ResizeCoordinator::default();
        let selector = presenting(SimulatedDisplay::new("sim").with_eye_size(None));

        let plan = resize.plan(800, 600, &selector, false).unwrap();
        assert_eq!(plan.surface_size, (2160, 1200));
    }

    #[test]
    fn zero_eye_parameters_use_default() {
        let resize = ResizeCoordinator::new((1000, 1000));
        let selector = presenting(SimulatedDisplay::new("sim").with_eye_size(Some((0, 0))));

        let plan = resize.plan(800, 600, &selector, false).unwrap();
        assert_eq!(plan.surface_size, (2000, 1000));
    }

    #[test]
    fn hmd_not_presenting_uses_raw_viewport() {
        let resize = ResizeCoordinator::default();
        let device: DisplayHandle = Rc::new(SimulatedDisplay::new("sim"));
        let selector = selector_with(DiscoveryOutcome::Found(device));

        let plan = resize.plan(1024, 768, &selector, false).unwrap();
        assert_eq!(plan.surface_size, (1024, 768));
    }

    #[test]
    fn spectator_is_planned_only_when_enabled() {
        let resize = ResizeCoordinator::default();
        let selector = selector_with(DiscoveryOutcome::NotFound);

        let plan = resize.plan(1000, 500, &selector, true).unwrap();
        let (aspect, size) = plan.spectator.unwrap();

        assert_relative_eq!(aspect, 2.0);
        assert_eq!(size, (1000, 500));
    }

    #[test]
    fn aspect_is_consistent_for_many_sizes() {
        let resize = ResizeCoordinator::default();
        let selector = selector_with(DiscoveryOutcome::NotFound);

        for (w, h) in [(1, 1), (1, 4096), (4096, 1), (1920, 1080), (333, 777)] {
            let plan = resize.plan(w, h, &selector, true).unwrap();
            assert_relative_eq!(plan.primary_aspect, w as f32 / h as f32);
            assert_eq!(plan.surface_size, (w, h));
            assert_eq!(plan.spectator.unwrap().1, (w, h));
        }
    }
}
