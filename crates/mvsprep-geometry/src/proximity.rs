//! Multi-view stereo matching needs, for every reference camera, the source
//! cameras that see the most similar view. On a planar grid rig the closest
//! cameras are the best candidates, so the score of a pair is the inverse of
//! the distance between the two cameras in grid units.

use crate::grid::CameraPosition;

/// Dense `N x N` matrix of pairwise camera scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    num_cameras: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    /// Number of cameras, the size of each side of the matrix.
    pub fn num_cameras(&self) -> usize {
        self.num_cameras
    }

    /// Score of camera `j` as a neighbour of camera `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not a camera id.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.num_cameras + j]
    }

    /// Scores of every camera as a neighbour of camera `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.num_cameras..(i + 1) * self.num_cameras]
    }
}

/// A selected neighbour camera and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Id of the neighbour camera.
    pub id: usize,
    /// Score of the neighbour, higher is closer.
    pub score: f64,
}

/// The neighbours of one camera, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourList {
    /// Id of the reference camera.
    pub camera_id: usize,
    /// Neighbours sorted by descending score.
    pub neighbours: Vec<Neighbour>,
}

impl NeighbourList {
    /// Number of selected neighbours.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// True if the camera has no selected neighbour.
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }
}

/// Inverse euclidean distance between two grid positions.
///
/// Two cameras at the same place score `-inf` so a camera is never its own
/// neighbour.
pub fn score_function(a: &CameraPosition, b: &CameraPosition) -> f64 {
    let dr = a.row as f64 - b.row as f64;
    let dc = a.col as f64 - b.col as f64;
    let distance = dr.hypot(dc);

    if distance == 0.0 {
        f64::NEG_INFINITY
    } else {
        1.0 / distance
    }
}

/// Compute the score of every pair of cameras.
///
/// # Arguments
///
/// * `positions` - The grid position of each camera, indexed by camera id.
///
/// # Returns
///
/// A symmetric matrix with `-inf` on the diagonal.
pub fn compute_scores(positions: &[CameraPosition]) -> ScoreMatrix {
    let num_cameras = positions.len();
    let mut data = vec![f64::NEG_INFINITY; num_cameras * num_cameras];

    for i in 0..num_cameras {
        for j in (i + 1)..num_cameras {
            let score = score_function(&positions[i], &positions[j]);
            data[i * num_cameras + j] = score;
            data[j * num_cameras + i] = score;
        }
    }

    ScoreMatrix { num_cameras, data }
}

/// Select the `max_neighbours` best scoring cameras of every camera.
///
/// Candidates are sorted by descending score with a stable sort, so equal
/// scores keep ascending camera id order.
pub fn best_neighbours(scores: &ScoreMatrix, max_neighbours: usize) -> Vec<NeighbourList> {
    (0..scores.num_cameras())
        .map(|camera_id| {
            let mut neighbours = scores
                .row(camera_id)
                .iter()
                .enumerate()
                .filter(|&(id, _)| id != camera_id)
                .map(|(id, &score)| Neighbour { id, score })
                .collect::<Vec<_>>();

            neighbours.sort_by(|a, b| b.score.total_cmp(&a.score));
            neighbours.truncate(max_neighbours);

            NeighbourList {
                camera_id,
                neighbours,
            }
        })
        .collect()
}

/// Drop the neighbours scoring below `min_score`.
///
/// Lists must be sorted best first, as returned by [`best_neighbours`].
pub fn filter_by_score(lists: &mut [NeighbourList], min_score: f64) {
    for list in lists.iter_mut() {
        let kept = list
            .neighbours
            .iter()
            .take_while(|n| n.score >= min_score)
            .count();
        list.neighbours.truncate(kept);
    }
}

/// Score the cameras and select at most `max_neighbours` neighbours scoring
/// at least `min_score` for each of them.
///
/// A camera left without neighbours is reported with a warning, it is not an
/// error.
pub fn select_neighbours(
    positions: &[CameraPosition],
    max_neighbours: usize,
    min_score: f64,
) -> Vec<NeighbourList> {
    let scores = compute_scores(positions);
    log::debug!("score matrix: {scores:?}");

    let mut lists = best_neighbours(&scores, max_neighbours);
    filter_by_score(&mut lists, min_score);

    for list in &lists {
        if list.is_empty() {
            log::warn!(
                "camera {} has no neighbour with a score >= {min_score}",
                list.camera_id
            );
        } else {
            log::debug!(
                "camera {}: {} neighbours {:?}",
                list.camera_id,
                list.len(),
                list.neighbours
            );
        }
    }

    lists
}
