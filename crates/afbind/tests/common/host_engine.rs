//! In-memory engine for integration tests
//!
//! Implements every entry point the bindings use on host memory, with
//! ArrayFire's column-major layout and argument rules close enough to
//! exercise the binding layer end to end. It also counts calls and live
//! handles so tests can observe what reached the engine.

use afbind::ffi::sys::{
    AF_ERR_ARG, AF_ERR_DIFF_TYPE, AF_ERR_INVALID_ARRAY, AF_ERR_NO_HALF, AF_ERR_SIZE, AF_ERR_TYPE,
    AF_SUCCESS,
};
use afbind::ffi::{AfArray, AfDtype, AfErr, DimT};
use afbind::{Complex64, DType, Dim4, Engine, Status};
use std::collections::HashMap;
use std::os::raw::{c_int, c_longlong, c_uint, c_ulonglong};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Shape = [usize; 4];

/// Element storage; 64-bit integer types keep full precision
#[derive(Debug, Clone)]
enum Buffer {
    Float(Vec<Complex64>),
    Wide(Vec<i128>),
}

/// Where an output element comes from
#[derive(Debug, Clone, Copy)]
enum Src {
    At(usize),
    Zero,
    One,
}

impl Buffer {
    fn len(&self) -> usize {
        match self {
            Buffer::Float(v) => v.len(),
            Buffer::Wide(v) => v.len(),
        }
    }

    fn gather(&self, src: &[Src]) -> Buffer {
        match self {
            Buffer::Float(v) => Buffer::Float(
                src.iter()
                    .map(|s| match *s {
                        Src::At(i) => v[i],
                        Src::Zero => Complex64::new(0.0, 0.0),
                        Src::One => Complex64::new(1.0, 0.0),
                    })
                    .collect(),
            ),
            Buffer::Wide(v) => Buffer::Wide(
                src.iter()
                    .map(|s| match *s {
                        Src::At(i) => v[i],
                        Src::Zero => 0,
                        Src::One => 1,
                    })
                    .collect(),
            ),
        }
    }

    fn append(&mut self, other: &Buffer) {
        match (self, other) {
            (Buffer::Float(a), Buffer::Float(b)) => a.extend_from_slice(b),
            (Buffer::Wide(a), Buffer::Wide(b)) => a.extend_from_slice(b),
            _ => unreachable!("dtype checked before append"),
        }
    }
}

#[derive(Debug)]
struct HostArray {
    dims: Shape,
    dtype: DType,
    data: Buffer,
}

impl HostArray {
    fn gather(&self, dims: Shape, src: &[Src]) -> HostArray {
        HostArray {
            dims,
            dtype: self.dtype,
            data: self.data.gather(src),
        }
    }
}

struct Failure(AfErr, String);

type Op = Result<HostArray, Failure>;

fn fail<T>(code: AfErr, message: impl Into<String>) -> Result<T, Failure> {
    Err(Failure(code, message.into()))
}

fn count(dims: &Shape) -> usize {
    dims.iter().product()
}

fn coords(mut linear: usize, dims: &Shape) -> Shape {
    let mut c = [0; 4];
    for axis in 0..4 {
        c[axis] = linear % dims[axis];
        linear /= dims[axis];
    }
    c
}

fn linear(c: &Shape, dims: &Shape) -> usize {
    c[0] + dims[0] * (c[1] + dims[1] * (c[2] + dims[2] * c[3]))
}

fn map_out(dims: &Shape, mut f: impl FnMut(Shape) -> Src) -> Vec<Src> {
    (0..count(dims)).map(|l| f(coords(l, dims))).collect()
}

fn shape(dims: &Dim4) -> Result<Shape, Failure> {
    let mut out = [0; 4];
    for (slot, &d) in out.iter_mut().zip(dims.get()) {
        if d < 0 {
            return fail(AF_ERR_SIZE, format!("negative dimension in {}", dims));
        }
        *slot = d as usize;
    }
    Ok(out)
}

fn dtype(code: AfDtype) -> Result<DType, Failure> {
    DType::try_from(code).or_else(|_| fail(AF_ERR_ARG, format!("unknown dtype {}", code)))
}

fn is_wide(dtype: DType) -> bool {
    matches!(dtype, DType::S64 | DType::U64)
}

/// Round a value to what an element of `dtype` can hold
fn coerce(dtype: DType, z: Complex64) -> Complex64 {
    let re = match dtype {
        DType::C32 => return Complex64::new(z.re as f32 as f64, z.im as f32 as f64),
        DType::C64 => return z,
        DType::F32 => z.re as f32 as f64,
        DType::F64 | DType::F16 => z.re,
        DType::B8 => (z.re != 0.0) as u8 as f64,
        DType::S32 => z.re as i32 as f64,
        DType::U32 => z.re as u32 as f64,
        DType::U8 => z.re as u8 as f64,
        DType::S16 => z.re as i16 as f64,
        DType::U16 => z.re as u16 as f64,
        DType::S64 => z.re as i64 as f64,
        DType::U64 => z.re as u64 as f64,
    };
    Complex64::new(re, 0.0)
}

fn filled(dtype: DType, dims: Shape, mut f: impl FnMut(usize) -> Complex64) -> HostArray {
    let n = count(&dims);
    let data = if is_wide(dtype) {
        Buffer::Wide(
            (0..n)
                .map(|i| match dtype {
                    DType::S64 => f(i).re as i64 as i128,
                    _ => f(i).re as u64 as i128,
                })
                .collect(),
        )
    } else {
        Buffer::Float((0..n).map(|i| coerce(dtype, f(i))).collect())
    };
    HostArray { dims, dtype, data }
}

fn real(v: f64) -> Complex64 {
    Complex64::new(v, 0.0)
}

fn splitmix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn uniform(state: &mut u64) -> f64 {
    (splitmix(state) >> 11) as f64 / (1u64 << 53) as f64
}

fn normal(state: &mut u64) -> f64 {
    let u1 = 1.0 - uniform(state);
    let u2 = uniform(state);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn bytes<const N: usize>(chunk: &[u8]) -> [u8; N] {
    chunk.try_into().expect("chunk width matches dtype size")
}

/// Engine whose arrays live in a host-side handle table
#[derive(Default)]
pub struct HostEngine {
    arrays: Mutex<HashMap<usize, Arc<HostArray>>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    seed: Mutex<u64>,
    rng: Mutex<u64>,
    last_error: Mutex<String>,
}

impl HostEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry points invoked so far, releases included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Handles not yet released
    pub fn live(&self) -> usize {
        self.arrays.lock().unwrap().len()
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn report(&self, failure: Failure) -> AfErr {
        let Failure(code, message) = failure;
        *self.last_error.lock().unwrap() = message;
        code
    }

    fn insert(&self, array: Arc<HostArray>) -> AfArray {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.arrays.lock().unwrap().insert(id, array);
        id as AfArray
    }

    fn lookup(&self, handle: AfArray) -> Result<Arc<HostArray>, Failure> {
        match self.arrays.lock().unwrap().get(&(handle as usize)) {
            Some(array) => Ok(Arc::clone(array)),
            None => fail(AF_ERR_INVALID_ARRAY, format!("unknown handle {:?}", handle)),
        }
    }

    fn emit(&self, out: &mut AfArray, result: Op) -> AfErr {
        self.tick();
        match result {
            Ok(array) => {
                *out = self.insert(Arc::new(array));
                AF_SUCCESS
            }
            Err(failure) => self.report(failure),
        }
    }

    fn finish(&self, result: Result<(), Failure>) -> AfErr {
        self.tick();
        match result {
            Ok(()) => AF_SUCCESS,
            Err(failure) => self.report(failure),
        }
    }

    fn random(&self, dims: &Dim4, code: AfDtype, gaussian: bool) -> Op {
        let dims = shape(dims)?;
        let dtype = dtype(code)?;
        let mut guard = self.rng.lock().unwrap();
        let state: &mut u64 = &mut guard;
        let draw: fn(&mut u64) -> f64 = if gaussian { normal } else { uniform };

        Ok(match dtype {
            DType::C32 | DType::C64 => filled(dtype, dims, |_| {
                let re = draw(state);
                Complex64::new(re, draw(state))
            }),
            DType::F16 | DType::F32 | DType::F64 => {
                filled(dtype, dims, |_| real(draw(state)))
            }
            DType::S64 | DType::U64 => HostArray {
                dims,
                dtype,
                data: Buffer::Wide(
                    (0..count(&dims))
                        .map(|_| match dtype {
                            DType::S64 => splitmix(state) as i64 as i128,
                            _ => splitmix(state) as i128,
                        })
                        .collect(),
                ),
            },
            _ => filled(dtype, dims, |_| real((splitmix(state) >> 57) as f64)),
        })
    }

    fn join_arrays(&self, dim: c_int, handles: &[AfArray]) -> Op {
        if !(0..4).contains(&dim) {
            return fail(AF_ERR_ARG, format!("join axis {} out of range", dim));
        }
        let dim = dim as usize;
        let inputs = handles
            .iter()
            .map(|&h| self.lookup(h))
            .collect::<Result<Vec<_>, _>>()?;
        let first = match inputs.first() {
            Some(first) => first,
            None => return fail(AF_ERR_ARG, "join needs at least one array"),
        };

        let mut dims = first.dims;
        dims[dim] = 0;
        let mut starts = Vec::with_capacity(inputs.len());
        for input in &inputs {
            if input.dtype != first.dtype {
                return fail(AF_ERR_DIFF_TYPE, "join inputs have different types");
            }
            let mismatch = (0..4).any(|axis| axis != dim && input.dims[axis] != first.dims[axis]);
            if mismatch {
                return fail(AF_ERR_SIZE, "join inputs differ outside the join axis");
            }
            starts.push(dims[dim]);
            dims[dim] += input.dims[dim];
        }

        let mut data = first.data.clone();
        let mut offsets = vec![0];
        for input in &inputs[1..] {
            offsets.push(data.len());
            data.append(&input.data);
        }

        let src = map_out(&dims, |mut c| {
            let which = starts.iter().rposition(|&s| s <= c[dim]).unwrap_or(0);
            c[dim] -= starts[which];
            Src::At(offsets[which] + linear(&c, &inputs[which].dims))
        });
        Ok(HostArray {
            dims,
            dtype: first.dtype,
            data: data.gather(&src),
        })
    }

    fn triangle(&self, input: AfArray, unit: bool, keep: fn(usize, usize) -> bool) -> Op {
        let a = self.lookup(input)?;
        let src = map_out(&a.dims, |c| {
            if unit && c[0] == c[1] {
                Src::One
            } else if keep(c[0], c[1]) {
                Src::At(linear(&c, &a.dims))
            } else {
                Src::Zero
            }
        });
        Ok(a.gather(a.dims, &src))
    }
}

impl Engine for HostEngine {
    fn name(&self) -> &str {
        "host"
    }

    fn error_message(&self, code: AfErr) -> String {
        let message = self.last_error.lock().unwrap().clone();
        if message.is_empty() {
            Status::from_code(code).name().to_string()
        } else {
            message
        }
    }

    fn version(&self) -> Option<(i32, i32, i32)> {
        Some((3, 9, 0))
    }

    fn constant(&self, out: &mut AfArray, value: f64, dims: &Dim4, code: AfDtype) -> AfErr {
        let result = shape(dims)
            .and_then(|dims| Ok(filled(dtype(code)?, dims, |_| real(value))));
        self.emit(out, result)
    }

    fn constant_complex(
        &self,
        out: &mut AfArray,
        re: f64,
        im: f64,
        dims: &Dim4,
        code: AfDtype,
    ) -> AfErr {
        let result = shape(dims).and_then(|dims| {
            let dtype = dtype(code)?;
            if !dtype.is_complex() {
                return fail(AF_ERR_TYPE, format!("complex fill into {}", dtype));
            }
            Ok(filled(dtype, dims, |_| Complex64::new(re, im)))
        });
        self.emit(out, result)
    }

    fn constant_long(&self, out: &mut AfArray, value: c_longlong, dims: &Dim4) -> AfErr {
        let result = shape(dims).map(|dims| HostArray {
            dims,
            dtype: DType::S64,
            data: Buffer::Wide(vec![value as i128; count(&dims)]),
        });
        self.emit(out, result)
    }

    fn constant_ulong(&self, out: &mut AfArray, value: c_ulonglong, dims: &Dim4) -> AfErr {
        let result = shape(dims).map(|dims| HostArray {
            dims,
            dtype: DType::U64,
            data: Buffer::Wide(vec![value as i128; count(&dims)]),
        });
        self.emit(out, result)
    }

    fn range(&self, out: &mut AfArray, dims: &Dim4, seq_dim: c_int, code: AfDtype) -> AfErr {
        let result = shape(dims).and_then(|dims| {
            let dtype = dtype(code)?;
            let axis = if seq_dim == -1 { 0 } else { seq_dim };
            if !(0..4).contains(&axis) {
                return fail(AF_ERR_ARG, format!("range axis {} out of range", seq_dim));
            }
            Ok(filled(dtype, dims, |l| {
                real(coords(l, &dims)[axis as usize] as f64)
            }))
        });
        self.emit(out, result)
    }

    fn iota(&self, out: &mut AfArray, dims: &Dim4, tile_dims: &Dim4, code: AfDtype) -> AfErr {
        let result = shape(dims).and_then(|base| {
            let tile = shape(tile_dims)?;
            let dtype = dtype(code)?;
            let mut dims = base;
            for axis in 0..4 {
                dims[axis] *= tile[axis];
            }
            Ok(filled(dtype, dims, |l| {
                let mut c = coords(l, &dims);
                for axis in 0..4 {
                    c[axis] %= base[axis];
                }
                real(linear(&c, &base) as f64)
            }))
        });
        self.emit(out, result)
    }

    fn randu(&self, out: &mut AfArray, dims: &Dim4, code: AfDtype) -> AfErr {
        let result = self.random(dims, code, false);
        self.emit(out, result)
    }

    fn randn(&self, out: &mut AfArray, dims: &Dim4, code: AfDtype) -> AfErr {
        let result = self.random(dims, code, true);
        self.emit(out, result)
    }

    fn identity(&self, out: &mut AfArray, dims: &Dim4, code: AfDtype) -> AfErr {
        let result = shape(dims).and_then(|dims| {
            Ok(filled(dtype(code)?, dims, |l| {
                let c = coords(l, &dims);
                real(if c[0] == c[1] { 1.0 } else { 0.0 })
            }))
        });
        self.emit(out, result)
    }

    fn create_array(&self, out: &mut AfArray, data: &[u8], dims: &Dim4, code: AfDtype) -> AfErr {
        let result = shape(dims).and_then(|dims| {
            let dtype = dtype(code)?;
            let size = dtype.size();
            if data.len() != count(&dims) * size {
                return fail(AF_ERR_SIZE, "host buffer does not match shape");
            }
            let chunks = data.chunks_exact(size);
            let buffer = match dtype {
                DType::S64 => Buffer::Wide(
                    chunks.map(|c| i64::from_ne_bytes(bytes(c)) as i128).collect(),
                ),
                DType::U64 => Buffer::Wide(
                    chunks.map(|c| u64::from_ne_bytes(bytes(c)) as i128).collect(),
                ),
                DType::F16 => return fail(AF_ERR_NO_HALF, "host engine has no half support"),
                _ => Buffer::Float(
                    chunks
                        .map(|c| match dtype {
                            DType::F32 => real(f32::from_ne_bytes(bytes(c)) as f64),
                            DType::F64 => real(f64::from_ne_bytes(bytes(c))),
                            DType::C32 => Complex64::new(
                                f32::from_ne_bytes(bytes(&c[..4])) as f64,
                                f32::from_ne_bytes(bytes(&c[4..])) as f64,
                            ),
                            DType::C64 => Complex64::new(
                                f64::from_ne_bytes(bytes(&c[..8])),
                                f64::from_ne_bytes(bytes(&c[8..])),
                            ),
                            DType::B8 => real((c[0] != 0) as u8 as f64),
                            DType::U8 => real(c[0] as f64),
                            DType::S32 => real(i32::from_ne_bytes(bytes(c)) as f64),
                            DType::U32 => real(u32::from_ne_bytes(bytes(c)) as f64),
                            DType::S16 => real(i16::from_ne_bytes(bytes(c)) as f64),
                            DType::U16 => real(u16::from_ne_bytes(bytes(c)) as f64),
                            _ => unreachable!("handled above"),
                        })
                        .collect(),
                ),
            };
            Ok(HostArray {
                dims,
                dtype,
                data: buffer,
            })
        });
        self.emit(out, result)
    }

    fn set_seed(&self, seed: c_ulonglong) -> AfErr {
        *self.seed.lock().unwrap() = seed;
        *self.rng.lock().unwrap() = seed;
        self.finish(Ok(()))
    }

    fn get_seed(&self, seed: &mut c_ulonglong) -> AfErr {
        *seed = *self.seed.lock().unwrap();
        self.finish(Ok(()))
    }

    fn diag_create(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        let result = self.lookup(input).and_then(|a| {
            if a.dims[1..].iter().any(|&d| d != 1) {
                return fail(AF_ERR_SIZE, "diag create needs a vector");
            }
            let n = a.dims[0] + num.unsigned_abs() as usize;
            let dims = [n, n, 1, 1];
            let k = num as i64;
            let src = map_out(&dims, |c| {
                let (row, col) = (c[0] as i64, c[1] as i64);
                if col - row == k {
                    Src::At((if k >= 0 { row } else { col }) as usize)
                } else {
                    Src::Zero
                }
            });
            Ok(a.gather(dims, &src))
        });
        self.emit(out, result)
    }

    fn diag_extract(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        let result = self.lookup(input).map(|a| {
            let (rows, cols, k) = (a.dims[0] as i64, a.dims[1] as i64, num as i64);
            let len = if k >= 0 {
                rows.min(cols - k)
            } else {
                (rows + k).min(cols)
            };
            let len = len.max(0) as usize;
            let dims = [len, 1, a.dims[2], a.dims[3]];
            let src = map_out(&dims, |c| {
                let i = c[0] as i64;
                let (row, col) = if k >= 0 { (i, i + k) } else { (i - k, i) };
                Src::At(linear(&[row as usize, col as usize, c[2], c[3]], &a.dims))
            });
            a.gather(dims, &src)
        });
        self.emit(out, result)
    }

    fn join(&self, out: &mut AfArray, dim: c_int, first: AfArray, second: AfArray) -> AfErr {
        let result = self.join_arrays(dim, &[first, second]);
        self.emit(out, result)
    }

    fn join_many(&self, out: &mut AfArray, dim: c_int, inputs: &[AfArray]) -> AfErr {
        let result = self.join_arrays(dim, inputs);
        self.emit(out, result)
    }

    fn tile(&self, out: &mut AfArray, input: AfArray, reps: [c_uint; 4]) -> AfErr {
        let result = self.lookup(input).map(|a| {
            let mut dims = a.dims;
            for axis in 0..4 {
                dims[axis] *= reps[axis] as usize;
            }
            let src = map_out(&dims, |mut c| {
                for axis in 0..4 {
                    c[axis] %= a.dims[axis];
                }
                Src::At(linear(&c, &a.dims))
            });
            a.gather(dims, &src)
        });
        self.emit(out, result)
    }

    fn reorder(&self, out: &mut AfArray, input: AfArray, axes: [c_uint; 4]) -> AfErr {
        let result = self.lookup(input).and_then(|a| {
            let mut seen = [false; 4];
            for &axis in &axes {
                if axis >= 4 || std::mem::replace(&mut seen[axis as usize], true) {
                    return fail(AF_ERR_ARG, format!("{:?} is not an axis permutation", axes));
                }
            }
            let dims = axes.map(|axis| a.dims[axis as usize]);
            let src = map_out(&dims, |c| {
                let mut from = [0; 4];
                for (i, &axis) in axes.iter().enumerate() {
                    from[axis as usize] = c[i];
                }
                Src::At(linear(&from, &a.dims))
            });
            Ok(a.gather(dims, &src))
        });
        self.emit(out, result)
    }

    fn shift(&self, out: &mut AfArray, input: AfArray, offsets: [c_int; 4]) -> AfErr {
        let result = self.lookup(input).map(|a| {
            let src = map_out(&a.dims, |c| {
                let mut from = [0; 4];
                for axis in 0..4 {
                    let extent = a.dims[axis] as i64;
                    from[axis] = (c[axis] as i64 - offsets[axis] as i64).rem_euclid(extent) as usize;
                }
                Src::At(linear(&from, &a.dims))
            });
            a.gather(a.dims, &src)
        });
        self.emit(out, result)
    }

    fn moddims(&self, out: &mut AfArray, input: AfArray, dims: &Dim4) -> AfErr {
        let result = self.lookup(input).and_then(|a| {
            let new_dims = shape(dims)?;
            if count(&new_dims) != count(&a.dims) {
                return fail(
                    AF_ERR_SIZE,
                    format!(
                        "moddims: {} elements cannot take shape {}",
                        count(&a.dims),
                        dims
                    ),
                );
            }
            Ok(HostArray {
                dims: new_dims,
                dtype: a.dtype,
                data: a.data.clone(),
            })
        });
        self.emit(out, result)
    }

    fn flat(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        let result = self.lookup(input).map(|a| HostArray {
            dims: [count(&a.dims), 1, 1, 1],
            dtype: a.dtype,
            data: a.data.clone(),
        });
        self.emit(out, result)
    }

    fn flip(&self, out: &mut AfArray, input: AfArray, dim: c_uint) -> AfErr {
        let result = self.lookup(input).and_then(|a| {
            if dim >= 4 {
                return fail(AF_ERR_ARG, format!("flip axis {} out of range", dim));
            }
            let axis = dim as usize;
            let src = map_out(&a.dims, |mut c| {
                c[axis] = a.dims[axis] - 1 - c[axis];
                Src::At(linear(&c, &a.dims))
            });
            Ok(a.gather(a.dims, &src))
        });
        self.emit(out, result)
    }

    fn lower(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        let result = self.triangle(input, is_unit_diag, |row, col| row >= col);
        self.emit(out, result)
    }

    fn upper(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        let result = self.triangle(input, is_unit_diag, |row, col| row <= col);
        self.emit(out, result)
    }

    fn retain_array(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        self.tick();
        match self.lookup(input) {
            Ok(array) => {
                *out = self.insert(array);
                AF_SUCCESS
            }
            Err(failure) => self.report(failure),
        }
    }

    fn release_array(&self, input: AfArray) -> AfErr {
        let removed = self.arrays.lock().unwrap().remove(&(input as usize));
        self.finish(match removed {
            Some(_) => Ok(()),
            None => fail(AF_ERR_INVALID_ARRAY, "release of unknown handle"),
        })
    }

    fn get_dims(&self, dims: &mut [DimT; 4], input: AfArray) -> AfErr {
        let result = self.lookup(input).map(|a| *dims = a.dims.map(|d| d as DimT));
        self.finish(result)
    }

    fn get_type(&self, code: &mut AfDtype, input: AfArray) -> AfErr {
        let result = self.lookup(input).map(|a| *code = a.dtype.code());
        self.finish(result)
    }

    fn get_elements(&self, elements: &mut DimT, input: AfArray) -> AfErr {
        let result = self.lookup(input).map(|a| *elements = count(&a.dims) as DimT);
        self.finish(result)
    }

    fn get_numdims(&self, ndims: &mut c_uint, input: AfArray) -> AfErr {
        let result = self
            .lookup(input)
            .map(|a| *ndims = Dim4::new(a.dims.map(|d| d as DimT)).ndims() as c_uint);
        self.finish(result)
    }

    fn get_data(&self, data: &mut [u8], input: AfArray) -> AfErr {
        let result = self.lookup(input).and_then(|a| {
            let size = a.dtype.size();
            if data.len() != a.data.len() * size {
                return fail(AF_ERR_SIZE, "host buffer does not match array");
            }
            for (i, chunk) in data.chunks_exact_mut(size).enumerate() {
                match &a.data {
                    Buffer::Wide(v) => match a.dtype {
                        DType::S64 => chunk.copy_from_slice(&(v[i] as i64).to_ne_bytes()),
                        _ => chunk.copy_from_slice(&(v[i] as u64).to_ne_bytes()),
                    },
                    Buffer::Float(v) => {
                        let z = v[i];
                        match a.dtype {
                            DType::F32 => chunk.copy_from_slice(&(z.re as f32).to_ne_bytes()),
                            DType::F64 => chunk.copy_from_slice(&z.re.to_ne_bytes()),
                            DType::C32 => {
                                chunk[..4].copy_from_slice(&(z.re as f32).to_ne_bytes());
                                chunk[4..].copy_from_slice(&(z.im as f32).to_ne_bytes());
                            }
                            DType::C64 => {
                                chunk[..8].copy_from_slice(&z.re.to_ne_bytes());
                                chunk[8..].copy_from_slice(&z.im.to_ne_bytes());
                            }
                            DType::B8 => chunk[0] = (z.re != 0.0) as u8,
                            DType::U8 => chunk[0] = z.re as u8,
                            DType::S32 => chunk.copy_from_slice(&(z.re as i32).to_ne_bytes()),
                            DType::U32 => chunk.copy_from_slice(&(z.re as u32).to_ne_bytes()),
                            DType::S16 => chunk.copy_from_slice(&(z.re as i16).to_ne_bytes()),
                            DType::U16 => chunk.copy_from_slice(&(z.re as u16).to_ne_bytes()),
                            _ => return fail(AF_ERR_NO_HALF, "host engine has no half support"),
                        }
                    }
                }
            }
            Ok(())
        });
        self.finish(result)
    }
}
