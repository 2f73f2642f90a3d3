//! Model retrieval and decoding
//!
//! Downloads a product model over HTTP with streamed progress, then decodes
//! it on a blocking worker into an [`Object`] ready for framing. glTF
//! (binary or embedded) and Wavefront OBJ are supported.

use std::io::Cursor;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3};
use futures::StreamExt;
use log::{debug, info};

use crate::{
    error::{Result, ViewerError},
    gfx::scene::{Mesh, Object},
};

/// First four bytes of a binary glTF container
const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Upper bound on what a `Content-Length` header may pre-allocate
const MAX_PREALLOCATION: u64 = 64 << 20;

/// Model file formats the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// glTF, binary or JSON with embedded buffers
    Gltf,
    /// Wavefront OBJ without materials
    Obj,
}

impl ModelFormat {
    /// Detects the format from the payload, falling back to the URL's extension.
    ///
    /// Unknown payloads are treated as glTF, the format product URLs carry.
    pub fn detect(url: &str, bytes: &[u8]) -> Self {
        if bytes.starts_with(GLB_MAGIC) {
            return ModelFormat::Gltf;
        }

        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        if path.ends_with(".obj") {
            ModelFormat::Obj
        } else {
            ModelFormat::Gltf
        }
    }
}

/// Fetches and decodes product models
#[derive(Clone)]
pub struct ModelLoader {
    client: reqwest::Client,
}

impl ModelLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Downloads `url` and decodes it.
    ///
    /// `on_progress` receives `downloaded / content_length` after every chunk
    /// when the server reports a length; without one it is never called.
    ///
    /// # Errors
    /// [`ViewerError::ModelLoad`] for transport failures, bad statuses and
    /// models without triangles; [`ViewerError::Decode`] for malformed files.
    pub async fn load(&self, url: &str, on_progress: impl FnMut(f32) + Send) -> Result<Object> {
        let bytes = self.download(url, on_progress).await?;

        let owned_url = url.to_string();
        let object = tokio::task::spawn_blocking(move || decode_model(&owned_url, &bytes))
            .await
            .map_err(|e| model_load_error(url, e))??;

        info!(
            "Loaded model {}: {} meshes, {} triangles",
            url,
            object.meshes.len(),
            object.triangle_count()
        );
        Ok(object)
    }

    async fn download(&self, url: &str, mut on_progress: impl FnMut(f32) + Send) -> Result<Vec<u8>> {
        debug!("Downloading model {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| model_load_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(model_load_error(url, format!("HTTP status: {}", status)));
        }

        let total_size = response.content_length().unwrap_or(0);

        // The header is only a hint; the body may be shorter or the server lying
        let mut bytes = Vec::new();
        bytes
            .try_reserve(total_size.min(MAX_PREALLOCATION) as usize)
            .map_err(|e| model_load_error(url, e))?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| model_load_error(url, e))?;
            bytes.extend_from_slice(&chunk);

            if total_size > 0 {
                on_progress(bytes.len() as f32 / total_size as f32);
            }
        }

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

fn model_load_error(url: &str, reason: impl ToString) -> ViewerError {
    ViewerError::ModelLoad {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Decodes model bytes into an [`Object`] named after the URL's file name
pub fn decode_model(url: &str, bytes: &[u8]) -> Result<Object> {
    let format = ModelFormat::detect(url, bytes);
    let meshes = match format {
        ModelFormat::Gltf => decode_gltf(bytes)?,
        ModelFormat::Obj => decode_obj(bytes)?,
    };

    let object = Object::new(meshes).with_name(file_name(url));
    if object.triangle_count() == 0 {
        return Err(model_load_error(url, "model contains no triangles"));
    }

    debug!(
        "Decoded {:?} model '{}': {} vertices",
        format,
        object.name,
        object.vertex_count()
    );
    Ok(object)
}

fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

/// Decodes glTF from the default scene, baking node transforms into the vertices.
///
/// Only buffers are loaded. Images are never decoded since nothing is textured.
fn decode_gltf(bytes: &[u8]) -> Result<Vec<Mesh>> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ViewerError::Decode("glTF file has no scene".into()))?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node_meshes(&node, Matrix4::identity(), &buffers, &mut meshes);
    }
    Ok(meshes)
}

fn collect_node_meshes(
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<Mesh>,
) {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = normal_matrix(&world);

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                debug!("Skipping non-triangle primitive in '{}'", mesh.name().unwrap_or("mesh"));
                continue;
            }

            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let positions: Vec<[f32; 3]> = positions
                .map(|p| {
                    let p = world * Vector3::from(p).extend(1.0);
                    [p.x, p.y, p.z]
                })
                .collect();

            // Without an invertible transform, normals are recomputed from the baked positions
            let normals: Vec<[f32; 3]> = match (reader.read_normals(), normal_matrix) {
                (Some(normals), Some(normal_matrix)) => normals
                    .map(|n| {
                        let n = normal_matrix * Vector3::from(n);
                        let n = if n.magnitude2() > 0.0 { n.normalize() } else { n };
                        [n.x, n.y, n.z]
                    })
                    .collect(),
                _ => Vec::new(),
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            meshes.push(Mesh::new(positions, normals, indices));
        }
    }

    for child in node.children() {
        collect_node_meshes(&child, world, buffers, meshes);
    }
}

/// Inverse-transpose of the upper 3x3, `None` for singular transforms
fn normal_matrix(world: &Matrix4<f32>) -> Option<Matrix3<f32>> {
    let upper = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    upper.invert().map(|inverse| inverse.transpose())
}

/// Decodes an OBJ file. Material libraries are never fetched.
fn decode_obj(bytes: &[u8]) -> Result<Vec<Mesh>> {
    let mut reader = Cursor::new(bytes);
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            Mesh::new(
                to_triples(&mesh.positions),
                to_triples(&mesh.normals),
                mesh.indices,
            )
        })
        .collect();
    Ok(meshes)
}

fn to_triples(flat: &[f32]) -> Vec<[f32; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::test_server::serve_once;
    use approx::assert_relative_eq;

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 2.0 0.0 0.0
v 0.0 4.0 0.0
f 1 2 3
";

    const QUAD_OBJ: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn test_detect_format() {
        assert_eq!(ModelFormat::detect("https://cdn/x/shoe.glb", b"glTF\x02\0\0\0"), ModelFormat::Gltf);
        assert_eq!(ModelFormat::detect("https://cdn/x/shoe.OBJ", b"v 0 0 0"), ModelFormat::Obj);
        assert_eq!(ModelFormat::detect("https://cdn/x/shoe.obj?v=2", b"v 0 0 0"), ModelFormat::Obj);
        assert_eq!(ModelFormat::detect("https://cdn/x/shoe", b"{}"), ModelFormat::Gltf);
        // Magic wins over a misleading extension
        assert_eq!(ModelFormat::detect("https://cdn/x/shoe.obj", b"glTF...."), ModelFormat::Gltf);
    }

    #[test]
    fn test_decode_obj_triangle() {
        let object = decode_model("https://cdn/models/tri.obj", TRIANGLE_OBJ.as_bytes()).unwrap();

        assert_eq!(object.name, "tri.obj");
        assert_eq!(object.triangle_count(), 1);
        let bounds = object.local_bounds().unwrap();
        assert_relative_eq!(bounds.max_dimension(), 4.0);
    }

    #[test]
    fn test_decode_obj_triangulates_quads() {
        let object = decode_model("quad.obj", QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(object.triangle_count(), 2);
        assert_eq!(object.vertex_count(), 4);
    }

    #[test]
    fn test_obj_without_faces_is_model_load_error() {
        let result = decode_model("https://cdn/empty.obj", b"v 0 0 0\nv 1 1 1\n");
        assert!(matches!(result, Err(ViewerError::ModelLoad { .. })));
    }

    #[test]
    fn test_garbage_gltf_is_decode_error() {
        let result = decode_model("https://cdn/broken.glb", b"glTF this is not a real container");
        assert!(matches!(result, Err(ViewerError::Decode(_))));
    }

    /// One triangle in an embedded buffer; `extra` is spliced into the root object
    fn triangle_gltf(extra: &str) -> String {
        // Three vec3 positions: (0,0,0), (1,0,0), (0,1,0)
        let buffer = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0 }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "buffers": [{{ "byteLength": 36, "uri": "data:application/octet-stream;base64,{buffer}" }}],
  "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}]{extra}
}}"#
        )
    }

    #[test]
    fn test_decode_gltf_triangle() {
        let object = decode_model("https://cdn/tri.gltf", triangle_gltf("").as_bytes()).unwrap();
        assert_eq!(object.triangle_count(), 1);
        assert_eq!(object.vertex_count(), 3);
    }

    #[test]
    fn test_decode_gltf_ignores_undecodable_images() {
        let gltf = triangle_gltf(
            r#",
  "images": [{ "uri": "data:image/webp;base64,UklGRhoAAABXRUJQVlA4TA0AAAAvAAAAEAcQERGIiP4HAA==" }],
  "textures": [{ "source": 0 }]"#,
        );
        let object = decode_model("https://cdn/textured.gltf", gltf.as_bytes()).unwrap();
        assert_eq!(object.triangle_count(), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("https://cdn/a/b/shoe.glb"), "shoe.glb");
        assert_eq!(file_name("https://cdn/a/b/shoe.glb?token=1"), "shoe.glb");
        assert_eq!(file_name("shoe.glb"), "shoe.glb");
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale_preserves_direction() {
        let m = normal_matrix(&Matrix4::from_scale(3.0)).unwrap();
        let n = (m * Vector3::unit_y()).normalize();
        assert_relative_eq!(n.x, 0.0);
        assert_relative_eq!(n.y, 1.0);
        assert_relative_eq!(n.z, 0.0);
        assert!(normal_matrix(&Matrix4::from_scale(0.0)).is_none());
    }

    #[test]
    fn test_unreachable_model_is_model_load_error() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let loader = ModelLoader::new(reqwest::Client::new());

        let mut calls = 0;
        let result = runtime.block_on(loader.load("http://127.0.0.1:9/shoe.glb", |_| calls += 1));

        assert!(matches!(result, Err(ViewerError::ModelLoad { .. })));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_oversized_content_length_is_model_load_error() {
        let url = serve_once(
            "/huge.glb",
            b"HTTP/1.1 200 OK\r\nContent-Length: 1125899906842624\r\n\r\nglTF".to_vec(),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let loader = ModelLoader::new(reqwest::Client::new());

        let result = runtime.block_on(loader.load(&url, |_| ()));
        assert!(matches!(result, Err(ViewerError::ModelLoad { .. })));
    }
}
