use mcschem::{
	compound,
	decode,
	encode,
	encode_with,
	list,
	math::Size3,
	nbt::{io::encode_root_map, tag::CompoundExt},
	EncodeOptions,
	ListTag,
	McError,
	NamedTag,
	Schematic,
	Tag,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::NamedTempFile;

/// A schematic filled with random blocks and a few positioned records.
fn random_schematic(rng: &mut StdRng) -> Schematic {
	let (x, y, z) = (rng.gen_range(1..8), rng.gen_range(1..5), rng.gen_range(1..8));
	let mut schematic = Schematic::new(x, y, z).unwrap();
	for by in 0..y {
		for bz in 0..z {
			for bx in 0..x {
				let id = rng.gen_range(0..=255);
				let meta = rng.gen_range(0..=15);
				schematic.set_block_and_meta(bx, by, bz, id, meta).unwrap();
			}
		}
	}
	for _ in 0..3 {
		let (tx, ty, tz) = (rng.gen_range(0..x), rng.gen_range(0..y), rng.gen_range(0..z));
		if let Tag::Compound(map) = compound!{ ("id", "Sign"), ("x", tx), ("y", ty), ("z", tz) } {
			schematic.tile_entities_mut().push(map);
		}
	}
	schematic
}

fn cells(schematic: &Schematic) -> Vec<(i32, i32, i32, u8, u8)> {
	let size = schematic.size();
	size.iter()
		.map(|coord| {
			let (x, y, z) = (coord.x as i32, coord.y as i32, coord.z as i32);
			(x, y, z, schematic.get_block_id(x, y, z), schematic.get_block_meta(x, y, z))
		})
		.collect()
}

#[test]
fn root_map_round_trip() {
	let Tag::Compound(root) = compound!( ("Test", compound!{ ("H", 5i16) }) ) else {
		unreachable!()
	};
	let bytes = encode_root_map(&root, EncodeOptions::default()).unwrap();
	let decoded = decode(&bytes).unwrap();
	assert_eq!(decoded.name, "Test");
	assert_eq!(Some(&decoded.tag), root.get_tag("Test"));
	assert_eq!(encode(&decoded).unwrap(), bytes);
}

#[test]
fn empty_named_root_map_round_trip() {
	let Tag::Compound(root) = compound!( ("", compound!{ ("H", 5i16) }) ) else {
		unreachable!()
	};
	let bytes = encode_root_map(&root, EncodeOptions::default()).unwrap();
	let decoded = decode(&bytes).unwrap();
	assert_eq!(decoded.name, "");
	assert_eq!(Some(&decoded.tag), root.get_tag(""));
}

#[test]
fn gzipped_file_round_trip() {
	let mut rng = StdRng::seed_from_u64(0x5eed);
	let mut schematic = random_schematic(&mut rng);
	if let Tag::Compound(map) = compound!{ ("id", "Pig"), ("Pos", list![0.5f64, 0.0, 0.5]) } {
		schematic.entities_mut().push(map);
	}
	let file = NamedTempFile::new().unwrap();
	schematic.write_to_file(file.path()).unwrap();
	let bytes = std::fs::read(file.path()).unwrap();
	assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
	let loaded = Schematic::read_from_file(file.path()).unwrap();
	assert_eq!(loaded, schematic);
}

#[test]
fn legacy_wrapped_document_loads() {
	let schematic = Schematic::new(2, 2, 2).unwrap();
	let bytes = schematic.to_bytes(EncodeOptions {
		wrap_legacy: true,
		..Default::default()
	}).unwrap();
	assert_eq!(&bytes[..3], &[0x0a, 0x00, 0x00]);
	assert_eq!(Schematic::from_bytes(&bytes).unwrap(), schematic);
}

#[test]
fn missing_tile_ticks_on_disk() {
	let compound = compound!{
		("Width", 1i16),
		("Height", 1i16),
		("Length", 1i16),
		("Materials", "Alpha"),
		("Blocks", vec![1i8]),
		("Data", vec![0i8]),
		("Entities", ListTag::Empty),
		("TileEntities", ListTag::Empty),
	};
	let bytes = encode_with(&NamedTag::new("Schematic", compound), EncodeOptions::default()).unwrap();
	let schematic = Schematic::from_bytes(&bytes).unwrap();
	assert_eq!(schematic.get_block_id(0, 0, 0), 1);
	assert!(schematic.tile_ticks().is_empty());
	let written = schematic.to_compound();
	assert!(written.has_tag("TileTicks"));
}

#[test]
fn rotation_closure_on_random_volumes() {
	let mut rng = StdRng::seed_from_u64(90);
	for _ in 0..20 {
		let original = random_schematic(&mut rng);
		let mut schematic = original.clone();
		for _ in 0..4 {
			schematic.rotate(90).unwrap();
		}
		assert_eq!(schematic, original);
		schematic.rotate(90).unwrap();
		schematic.rotate(270).unwrap();
		assert_eq!(schematic, original);
		schematic.rotate(180).unwrap();
		schematic.rotate(180).unwrap();
		assert_eq!(schematic, original);
	}
}

#[test]
fn rotated_tile_entities_stay_on_their_blocks() {
	let mut rng = StdRng::seed_from_u64(7);
	for _ in 0..20 {
		let mut schematic = random_schematic(&mut rng);
		let marked: Vec<u8> = schematic.tile_entities().iter()
			.map(|record| match (record.get_tag("x"), record.get_tag("y"), record.get_tag("z")) {
				(Some(Tag::Int(x)), Some(Tag::Int(y)), Some(Tag::Int(z))) => schematic.get_block_id(*x, *y, *z),
				_ => unreachable!(),
			})
			.collect();
		let angle = [90, 180, 270][rng.gen_range(0..3)];
		schematic.rotate(angle).unwrap();
		for (record, id) in schematic.tile_entities().iter().zip(marked) {
			match (record.get_tag("x"), record.get_tag("y"), record.get_tag("z")) {
				(Some(Tag::Int(x)), Some(Tag::Int(y)), Some(Tag::Int(z))) => {
					assert_eq!(schematic.get_block_id(*x, *y, *z), id);
				}
				_ => unreachable!(),
			}
		}
	}
}

#[test]
fn growing_keeps_every_cell() {
	let mut rng = StdRng::seed_from_u64(42);
	for _ in 0..20 {
		let original = random_schematic(&mut rng);
		let before = cells(&original);
		let size = original.size();
		let mut schematic = original.clone();
		schematic.resize(
			size.x as i32 + rng.gen_range(0..4),
			size.y as i32 + rng.gen_range(0..4),
			size.z as i32 + rng.gen_range(0..4),
			0, 0, 0,
		).unwrap();
		for (x, y, z, id, meta) in before {
			assert_eq!(schematic.get_block_id(x, y, z), id);
			assert_eq!(schematic.get_block_meta(x, y, z), meta);
		}
		assert_eq!(schematic.tile_entities(), original.tile_entities());
	}
}

#[test]
fn resize_to_own_size_is_identity() {
	let mut rng = StdRng::seed_from_u64(3);
	let original = random_schematic(&mut rng);
	let Size3 { x, y, z } = original.size();
	let mut schematic = original.clone();
	schematic.resize(x as i32, y as i32, z as i32, 0, 0, 0).unwrap();
	assert_eq!(schematic, original);
}

#[test]
fn reads_outside_default_to_air() {
	let mut rng = StdRng::seed_from_u64(11);
	let schematic = random_schematic(&mut rng);
	let size = schematic.size();
	for _ in 0..200 {
		let x = rng.gen_range(-50..50);
		let y = rng.gen_range(-50..50);
		let z = rng.gen_range(-50..50);
		if schematic.index_of(x, y, z).is_none() {
			assert_eq!(schematic.get_block_id(x, y, z), 0);
			assert_eq!(schematic.get_block_meta(x, y, z), 0);
		}
	}
	assert_eq!(schematic.get_block_id(size.x as i32, 0, 0), 0);
}

#[test]
fn invalid_rotation_is_rejected() {
	let mut schematic = Schematic::new(1, 1, 1).unwrap();
	assert!(matches!(schematic.rotate(100), Err(McError::InvalidRotationAmount(100))));
}
