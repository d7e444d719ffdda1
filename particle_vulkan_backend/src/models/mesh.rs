use crate::models::{index::IndexType, vertex::Vertex};
//////////////////////// Structs ///////////////////////
/// Static geometry uploaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<IndexType>,
}
//////////////////////// Impls ///////////////////////
impl Mesh {
    /// One triangle with a red, a green and a blue corner.
    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                Vertex::new([1.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
                Vertex::new([-1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
                Vertex::new([0.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
            ],
            indices: vec![0, 1, 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_indices_cover_all_vertices() {
        let mesh = Mesh::triangle();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].pos, glm::vec3(1.0, 1.0, 0.0));
        assert_eq!(mesh.vertices[2].color, glm::vec3(0.0, 0.0, 1.0));
    }
}
