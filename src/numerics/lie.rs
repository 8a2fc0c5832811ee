extern crate nalgebra as na;

use na::{Vector,Vector3,Matrix3,Matrix,U3,U1,base::storage::Storage};
use crate::Float;

/** Below this rotation angle the closed forms are replaced by their Taylor expansions. */
pub const SMALL_ANGLE: Float = 1e-6;

pub fn skew_symmetric<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1>  {
    Matrix3::<Float>::new(0.0, -w[2], w[1],
                          w[2], 0.0, -w[0],
                          -w[1], w[0], 0.0)
}

pub fn vector_from_skew_symmetric(w_x: &Matrix3<Float>) -> Vector3<Float> {
    Vector3::<Float>::new(w_x[(2,1)],w_x[(0,2)],w_x[(1,0)])
}

#[allow(non_snake_case)]
pub fn exp_r<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let omega = w.norm();
    let w_x = skew_symmetric(w);
    let w_x_sqr = w_x*w_x;
    let I = Matrix3::<Float>::identity();

    match omega {
        o if o < SMALL_ANGLE => I + w_x + 0.5*w_x_sqr,
        o => {
            let omega_sqr = o.powi(2);
            let A = o.sin()/o;
            let B = (1.0 - o.cos())/omega_sqr;
            I + A*w_x + B*w_x_sqr
        }
    }
}

#[allow(non_snake_case)]
pub fn ln_r<T>(R: &Matrix<Float,U3,U3,T>) -> Vector3<Float> where T: Storage<Float,U3,U3> {
    let cos_omega = ((R.trace() - 1.0)/2.0).clamp(-1.0,1.0);
    let omega = cos_omega.acos();
    let antisymmetric = R - R.transpose();

    let factor = match omega {
        o if o < SMALL_ANGLE => 0.5,
        o => o/(2.0*o.sin())
    };
    vector_from_skew_symmetric(&(factor*antisymmetric))
}

#[allow(non_snake_case)]
pub fn right_jacobian<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let w_x = skew_symmetric(w);
    let w_x_sqr = w_x*w_x;
    let w_norm = w.norm();
    let I = Matrix3::<Float>::identity();

    let (A,B) = match w_norm {
        n if n < SMALL_ANGLE => (0.5, 1.0/6.0),
        n => {
            let w_norm_sqrd = n.powi(2);
            ((1.0 - n.cos())/w_norm_sqrd, (n - n.sin())/(w_norm_sqrd*n))
        }
    };

    I - A*w_x + B*w_x_sqr
}

#[allow(non_snake_case)]
pub fn right_inverse_jacobian<T>(w: &Vector<Float,U3,T>) -> Matrix3<Float> where T: Storage<Float,U3,U1> {
    let w_x = skew_symmetric(w);
    let w_x_sqr = w_x*w_x;
    let w_norm = w.norm();
    let I = Matrix3::<Float>::identity();

    let factor = match w_norm {
        n if n < SMALL_ANGLE => 1.0/12.0,
        n => 1.0/n.powi(2) - (1.0+n.cos())/(2.0*n*n.sin())
    };

    I + 0.5*w_x + factor*w_x_sqr
}
