extern crate nalgebra as na;

use na::{Vector,Vector3,Vector6,storage::Storage,Const};
use crate::Float;

/**
 * Accelerometer and gyroscope bias. The preintegration is linearized around one of these.
 */
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct ImuBias {
    pub bias_a: Vector3<Float>,
    pub bias_g: Vector3<Float>
}

impl ImuBias {

    pub fn zero() -> ImuBias {
        ImuBias {
            bias_a: Vector3::<Float>::zeros(),
            bias_g: Vector3::<Float>::zeros()
        }
    }

    pub fn new(bias_a: Vector3<Float>, bias_g: Vector3<Float>) -> ImuBias {
        ImuBias {bias_a, bias_g}
    }

    // Perturbation layout is [accelerometer; gyroscope].
    pub fn add_pertb<R>(&self, new_pertb: &Vector<Float,Const<6>,R>) -> ImuBias where R: Storage<Float,Const<6>,Const<1>> {
        ImuBias {
            bias_a: self.bias_a + new_pertb.fixed_rows::<3>(0),
            bias_g: self.bias_g + new_pertb.fixed_rows::<3>(3)
        }
    }

    pub fn difference(&self, other: &ImuBias) -> ImuBias {
        ImuBias {
            bias_a: self.bias_a - other.bias_a,
            bias_g: self.bias_g - other.bias_g
        }
    }

    pub fn to_vector(&self) -> Vector6<Float> {
        let mut v = Vector6::<Float>::zeros();
        v.fixed_rows_mut::<3>(0).copy_from(&self.bias_a);
        v.fixed_rows_mut::<3>(3).copy_from(&self.bias_g);
        v
    }

    pub fn norm(&self) -> Float {
        self.bias_a.norm() + self.bias_g.norm()
    }

    pub fn correct_accelerometer(&self, measured_acc: &Vector3<Float>) -> Vector3<Float> {
        measured_acc - self.bias_a
    }

    pub fn correct_gyroscope(&self, measured_omega: &Vector3<Float>) -> Vector3<Float> {
        measured_omega - self.bias_g
    }
}

impl Default for ImuBias {
    fn default() -> ImuBias {
        ImuBias::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturbation_layout() {
        let bias = ImuBias::new(Vector3::<Float>::new(1.0,2.0,3.0), Vector3::<Float>::new(4.0,5.0,6.0));
        let pertb = Vector6::<Float>::new(0.5,0.5,0.5,-1.0,-1.0,-1.0);
        let updated = bias.add_pertb(&pertb);

        assert_eq!(updated.bias_a, Vector3::<Float>::new(1.5,2.5,3.5));
        assert_eq!(updated.bias_g, Vector3::<Float>::new(3.0,4.0,5.0));
        assert_eq!(updated.difference(&bias).to_vector(), pertb);
        assert_eq!(ImuBias::default().norm(), 0.0);
    }
}
