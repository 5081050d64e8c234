use super::coord::Coord3;

/// Extents of a block volume anchored at the origin.
///
/// Cells are laid out Y outer, Z middle, X inner, so the flat index of
/// `(x, y, z)` is `x + z * x_size + y * x_size * z_size`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size3 {
	pub x: usize,
	pub y: usize,
	pub z: usize,
}

impl Size3 {
	#[inline(always)]
	pub fn new(x: usize, y: usize, z: usize) -> Self {
		Self {
			x,
			y,
			z
		}
	}

	#[inline(always)]
	pub fn volume(self) -> usize {
		self.x * self.y * self.z
	}

	/// Whether `coord` lies in `[0, size)` on every axis.
	#[inline]
	pub fn contains(self, coord: Coord3) -> bool {
		(0..self.x as i64).contains(&coord.x)
		&& (0..self.y as i64).contains(&coord.y)
		&& (0..self.z as i64).contains(&coord.z)
	}

	/// Flat index of `coord`, or `None` outside of the volume.
	#[inline]
	pub fn index(self, coord: Coord3) -> Option<usize> {
		if self.contains(coord) {
			Some(self.index_unchecked(coord.x as usize, coord.y as usize, coord.z as usize))
		} else {
			None
		}
	}

	#[inline(always)]
	pub(crate) fn index_unchecked(self, x: usize, y: usize, z: usize) -> usize {
		x + z * self.x + y * self.x * self.z
	}

	/// Inverse of [Size3::index].
	pub fn coord(self, index: usize) -> Option<Coord3> {
		if index >= self.volume() {
			return None;
		}
		let layer = self.x * self.z;
		let y = index / layer;
		let z = (index % layer) / self.x;
		let x = index % self.x;
		Some(Coord3::new(x as i64, y as i64, z as i64))
	}

	/// Every coordinate of the volume in flat index order.
	pub fn iter(self) -> impl Iterator<Item = Coord3> {
		(0..self.y).flat_map(move |y| {
			(0..self.z).flat_map(move |z| {
				(0..self.x).map(move |x| Coord3::new(x as i64, y as i64, z as i64))
			})
		})
	}
}

impl From<(usize, usize, usize)> for Size3 {
	fn from(value: (usize, usize, usize)) -> Self {
		Size3::new(value.0, value.1, value.2)
	}
}
