/// Overlay frame to host world rotation matrix (row-major: [x_new, y_new, z_new]).
/// Rings are generated Z-up; Bevy scenes are Y-up.
/// Default: -90° X rotation (Z→Y, -Y→Z, X→X)
pub const Z_UP_TO_Y_UP: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0],  // X = X
    [0.0, 0.0, 1.0],  // Y = Z
    [0.0, -1.0, 0.0], // Z = -Y
];
