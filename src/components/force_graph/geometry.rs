//! Viewport transform math: world <-> screen mapping, zoom about a point,
//! and the eased transition used when centering on a node.

/// Pan and zoom transform applied to the entire graph view.
///
/// A world point `(wx, wy)` is drawn at `(x + wx * k, y + wy * k)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Screen x of the world origin.
	pub x: f64,
	/// Screen y of the world origin.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No pan, no zoom.
	pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

	/// Map world coordinates to screen coordinates.
	pub fn apply(&self, wx: f64, wy: f64) -> (f64, f64) {
		(self.x + wx * self.k, self.y + wy * self.k)
	}

	/// Map screen coordinates back to world coordinates.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	/// The resulting scale is clamped to `min_k..=max_k`.
	pub fn zoom_about(&self, sx: f64, sy: f64, factor: f64, min_k: f64, max_k: f64) -> Self {
		let k = (self.k * factor).clamp(min_k, max_k);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Transform that puts the world point `point` at the middle of a viewport
/// of size `viewport`, keeping the zoom factor `k`.
pub fn center_on(point: (f64, f64), viewport: (f64, f64), k: f64) -> ViewTransform {
	let (x, y) = point;
	let (w, h) = viewport;
	ViewTransform {
		x: w / 2.0 - x * k,
		y: h / 2.0 - y * k,
		k,
	}
}

/// Cubic ease-in-out on `0..=1`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// An in-flight animated move between two transforms.
///
/// Only one transition exists at a time; starting a new one replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

impl Transition {
	/// Transition from `from` to `to` over `duration` seconds.
	pub fn new(from: ViewTransform, to: ViewTransform, duration: f64) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration,
		}
	}

	/// Final transform of this transition.
	pub fn target(&self) -> ViewTransform {
		self.to
	}

	/// Advance by `dt` seconds and return the transform for this frame.
	pub fn advance(&mut self, dt: f64) -> ViewTransform {
		self.elapsed += dt;
		if self.is_finished() {
			return self.to;
		}
		self.from
			.lerp(&self.to, ease_in_out_cubic(self.elapsed / self.duration))
	}

	/// True once the full duration has elapsed.
	pub fn is_finished(&self) -> bool {
		self.duration <= 0.0 || self.elapsed >= self.duration
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const EPS: f64 = 1e-6;

	#[test]
	fn centers_point_at_viewport_middle() {
		let t = center_on((100.0, 50.0), (800.0, 600.0), 2.0);
		assert_eq!(t, ViewTransform { x: 200.0, y: 200.0, k: 2.0 });
		assert_eq!(t.apply(100.0, 50.0), (400.0, 300.0));
	}

	#[test]
	fn zoom_keeps_pointer_fixed() {
		let t = ViewTransform { x: 30.0, y: -20.0, k: 1.5 };
		let world = t.invert(120.0, 80.0);
		let zoomed = t.zoom_about(120.0, 80.0, 1.1, 0.1, 10.0);
		let (sx, sy) = zoomed.apply(world.0, world.1);
		assert!((sx - 120.0).abs() < EPS);
		assert!((sy - 80.0).abs() < EPS);
	}

	#[test]
	fn zoom_is_clamped() {
		let t = ViewTransform { x: 0.0, y: 0.0, k: 9.5 };
		assert_eq!(t.zoom_about(0.0, 0.0, 2.0, 0.1, 10.0).k, 10.0);
		let t = ViewTransform { x: 0.0, y: 0.0, k: 0.11 };
		assert_eq!(t.zoom_about(0.0, 0.0, 0.5, 0.1, 10.0).k, 0.1);
	}

	#[test]
	fn easing_endpoints() {
		assert_eq!(ease_in_out_cubic(0.0), 0.0);
		assert_eq!(ease_in_out_cubic(1.0), 1.0);
		assert!((ease_in_out_cubic(0.5) - 0.5).abs() < EPS);
		assert!(ease_in_out_cubic(0.25) < 0.25);
	}

	#[test]
	fn transition_ends_on_target() {
		let from = ViewTransform::IDENTITY;
		let to = ViewTransform { x: 100.0, y: -40.0, k: 1.0 };
		let mut tr = Transition::new(from, to, 0.75);

		let mid = tr.advance(0.375);
		assert!(!tr.is_finished());
		assert!((mid.x - 50.0).abs() < EPS);
		assert!((mid.y + 20.0).abs() < EPS);

		assert_eq!(tr.advance(0.5), to);
		assert!(tr.is_finished());
	}

	#[test]
	fn zero_duration_jumps() {
		let to = ViewTransform { x: 5.0, y: 5.0, k: 2.0 };
		let mut tr = Transition::new(ViewTransform::IDENTITY, to, 0.0);
		assert!(tr.is_finished());
		assert_eq!(tr.advance(0.0), to);
	}

	proptest! {
		#[test]
		fn centered_point_projects_to_middle(
			x in -1e4f64..1e4,
			y in -1e4f64..1e4,
			w in 1.0f64..4000.0,
			h in 1.0f64..4000.0,
			k in 0.1f64..10.0,
		) {
			let t = center_on((x, y), (w, h), k);
			let (sx, sy) = t.apply(x, y);
			prop_assert!((sx - w / 2.0).abs() < 1e-6);
			prop_assert!((sy - h / 2.0).abs() < 1e-6);
			prop_assert_eq!(t.k, k);
		}
	}
}
