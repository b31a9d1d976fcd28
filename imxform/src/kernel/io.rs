use alloc::vec::Vec;
use ndarray::{aview1, aview_mut1, Array1, Array2, ArrayView2, ArrayViewMut2, Axis};

/// Adapter trait for reading a 2D matrix input.
///
/// One-dimensional containers are read as a single `1 x N` row.
pub trait Read2D<T> {
    /// Borrow the underlying input as a 2D view.
    fn read_view(&self) -> ArrayView2<'_, T>;
}

/// Adapter trait for writing a 2D matrix output.
pub trait Write2D<T> {
    /// Borrow the underlying output as a mutable 2D view.
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T>;
}

impl<T> Read2D<T> for Array2<T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

impl<T> Write2D<T> for Array2<T> {
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.view_mut()
    }
}

impl<'a, T> Read2D<T> for ArrayView2<'a, T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        self.view()
    }
}

impl<'a, T> Write2D<T> for ArrayViewMut2<'a, T> {
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.view_mut()
    }
}

impl<T> Read2D<T> for Array1<T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        self.view().insert_axis(Axis(0))
    }
}

impl<T> Write2D<T> for Array1<T> {
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.view_mut().insert_axis(Axis(0))
    }
}

impl<T> Read2D<T> for [T] {
    fn read_view(&self) -> ArrayView2<'_, T> {
        aview1(self).insert_axis(Axis(0))
    }
}

impl<T> Write2D<T> for [T] {
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        aview_mut1(self).insert_axis(Axis(0))
    }
}

impl<T, const N: usize> Read2D<T> for [T; N] {
    fn read_view(&self) -> ArrayView2<'_, T> {
        aview1(self.as_slice()).insert_axis(Axis(0))
    }
}

impl<T> Read2D<T> for Vec<T> {
    fn read_view(&self) -> ArrayView2<'_, T> {
        aview1(self.as_slice()).insert_axis(Axis(0))
    }
}

impl<T> Write2D<T> for Vec<T> {
    fn write_view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        aview_mut1(self.as_mut_slice()).insert_axis(Axis(0))
    }
}

#[cfg(test)]
mod tests {
    use super::{Read2D, Write2D};
    use ndarray::{array, Array1, Array2};

    #[test]
    fn one_dimensional_inputs_read_as_single_row() {
        let a = [1, 2, 3];
        assert_eq!(a.read_view().dim(), (1, 3));

        let s: &[i32] = &a;
        assert_eq!(s.read_view()[(0, 1)], 2);

        let v = vec![4, 5];
        assert_eq!(v.read_view().dim(), (1, 2));

        let arr = Array1::from(vec![7, 8, 9, 10]);
        assert_eq!(arr.read_view().dim(), (1, 4));
    }

    #[test]
    fn matrix_adapters_keep_shape() {
        let m = array![[11, 12], [21, 22]];
        assert_eq!(m.read_view().dim(), (2, 2));
        assert_eq!(m.t().read_view()[(0, 1)], 21);
    }

    #[test]
    fn write_adapters() {
        let mut out = Array2::<i32>::zeros((2, 2));
        out.write_view_mut().fill(3);
        assert_eq!(out, array![[3, 3], [3, 3]]);

        let mut v = vec![0.0f64; 3];
        v.write_view_mut()[(0, 2)] = 1.5;
        assert_eq!(v, vec![0.0, 0.0, 1.5]);
    }
}
