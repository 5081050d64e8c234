/// A column coordinate on the XZ plane, used for chunk positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord2 {
	pub x: i64,
	pub z: i64,
}

/// A block coordinate. Signed, so it can address the void around a volume.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord3 {
	pub x: i64,
	pub y: i64,
	pub z: i64,
}

impl Coord2 {
	#[inline(always)]
	pub fn new(x: i64, z: i64) -> Self {
		Self {
			x,
			z
		}
	}

	#[inline(always)]
	pub fn xz(self) -> (i64, i64) {
		(self.x, self.z)
	}
}

impl Coord3 {
	#[inline(always)]
	pub fn new(x: i64, y: i64, z: i64) -> Self {
		Self {
			x,
			y,
			z
		}
	}

	#[inline(always)]
	pub fn map<F: Fn(i64)->i64>(self, map: F) -> Self {
		Self {
			x: map(self.x),
			y: map(self.y),
			z: map(self.z)
		}
	}

	#[inline(always)]
	pub fn xyz(self) -> (i64, i64, i64) {
		(
			self.x,
			self.y,
			self.z
		)
	}

	/// The 16x16 chunk column that contains this block.
	/// Negative coordinates round toward negative infinity.
	#[inline(always)]
	pub fn chunk_coord(self) -> Coord2 {
		Coord2 {
			x: self.x.div_euclid(16),
			z: self.z.div_euclid(16),
		}
	}

	/// Position of this block inside its 16x16x16 section.
	#[inline(always)]
	pub fn subchunk_coord(self) -> Self {
		self.map(|value| value.rem_euclid(16))
	}
}

impl From<(i64, i64, i64)> for Coord3 {
	fn from(value: (i64, i64, i64)) -> Self {
		Coord3::new(
			value.0,
			value.1,
			value.2
		)
	}
}

impl From<(i32, i32, i32)> for Coord3 {
	fn from(value: (i32, i32, i32)) -> Self {
		Coord3::new(
			value.0 as i64,
			value.1 as i64,
			value.2 as i64
		)
	}
}

impl From<Coord3> for (i64, i64, i64) {
	fn from(value: Coord3) -> Self {
		value.xyz()
	}
}

impl std::ops::Add<Coord3> for Coord3 {
	type Output = Coord3;

	#[inline(always)]
	fn add(self, rhs: Coord3) -> Self::Output {
		Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
	}
}

impl std::ops::Sub<Coord3> for Coord3 {
	type Output = Coord3;

	#[inline(always)]
	fn sub(self, rhs: Coord3) -> Self::Output {
		Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
	}
}
