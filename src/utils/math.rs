//! Additional math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Cross-product matrix: `skew(a) * b == a.cross(b)`.
pub fn skew(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}

/// Outer product `a * bᵀ`.
pub fn outer(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Rotates a body-space inverse inertia tensor into world space.
pub fn world_inverse_inertia(local: Mat3, rotation: Quat) -> Mat3 {
    let r = Mat3::from_quat(rotation);
    r * local * r.transpose()
}

/// Applies a small rotation `omega_dt` (axis × angle) with the first-order
/// update `normalize(q + ½·[ω,0]⊗q)`.
pub fn integrate_rotation(rotation: Quat, omega_dt: Vec3) -> Quat {
    let spin = Quat::from_xyzw(omega_dt.x, omega_dt.y, omega_dt.z, 0.0) * rotation;
    (rotation + spin * 0.5).normalize()
}

/// Angular velocity that carries `previous` onto `current` over `dt`.
pub fn angular_velocity_between(previous: Quat, current: Quat, dt: f32) -> Vec3 {
    let delta = current * previous.conjugate();
    let omega = Vec3::new(delta.x, delta.y, delta.z) * (2.0 / dt);
    if delta.w >= 0.0 {
        omega
    } else {
        -omega
    }
}

/// Closest point to `p` on triangle `abc` (Ericson, Real-Time Collision Detection §5.1.5).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Barycentric coordinates of `p` projected onto the plane of `abc`.
///
/// Coordinates are not clamped, so points outside the triangle extrapolate.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= f32::EPSILON {
        return Vec3::new(1.0, 0.0, 0.0);
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Vec3::new(1.0 - v - w, v, w)
}

/// Any unit vector perpendicular to `v`.
pub fn any_perpendicular(v: Vec3) -> Vec3 {
    let axis = if v.x.abs() < 0.57 { Vec3::X } else { Vec3::Y };
    v.cross(axis).normalize_or_zero()
}
