//! mAP evaluation engine.
//!
//! Pipeline per category: IoU matrix -> greedy matching -> precision/recall
//! curve -> interpolated AP. Category APs are averaged into mAP.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry;
use crate::params::Params;
use crate::types::{CategoryId, Detection, GroundTruth};

/// Evaluation outcome for a single category.
#[derive(Debug, Clone)]
pub struct CategoryEval {
    pub category_id: CategoryId,
    pub ap: f64,
    pub num_detections: usize,
    pub num_ground_truths: usize,
    pub true_positives: usize,
}

/// Aggregated evaluation results.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Mean of the per-category APs.
    pub map: f64,
    /// One entry per category, in sorted category order.
    pub per_category: Vec<CategoryEval>,
}

/// The mAP evaluation object.
///
/// Holds the detection and ground-truth collections plus parameters, and
/// populates `eval` on [`MapEval::evaluate`].
pub struct MapEval {
    pub detections: Vec<Detection>,
    pub ground_truths: Vec<GroundTruth>,
    pub params: Params,
    pub eval: Option<Evaluation>,
}

impl MapEval {
    /// Create a new evaluation over the given collections.
    pub fn new(detections: Vec<Detection>, ground_truths: Vec<GroundTruth>, params: Params) -> Self {
        MapEval {
            detections,
            ground_truths,
            params,
            eval: None,
        }
    }

    /// Run the full evaluation, storing the result in `self.eval`.
    pub fn evaluate(&mut self) -> Result<()> {
        self.eval = Some(mean_average_precision(
            &self.detections,
            &self.ground_truths,
            &self.params,
        )?);
        Ok(())
    }

    /// Print per-category AP lines and the final mAP.
    pub fn summarize(&self) {
        let eval = match &self.eval {
            Some(e) => e,
            None => {
                eprintln!("Please run evaluate() first.");
                return;
            }
        };

        for cat in &eval.per_category {
            println!(
                " Average Precision  (AP) @[ IoU={:<4} | category={:>10} ] = {:0.3}",
                self.params.iou_threshold,
                cat.category_id.to_string(),
                cat.ap
            );
        }
        println!(
            " Mean Avg Precision (mAP) @[ IoU={:<4} | categories={:>8} ] = {:0.3}",
            self.params.iou_threshold,
            eval.per_category.len(),
            eval.map
        );
    }
}

/// Compute mean Average Precision over the categories present in the
/// detection set.
///
/// The category universe is the sorted set of distinct detection category
/// ids; categories that appear only in the ground truth do not contribute.
/// Detections are evaluated in the order given (not re-sorted by score), and
/// ground truths are pooled across images within a category. Callers wanting
/// score-ranked, per-image evaluation should sort and partition their inputs
/// first.
///
/// All boxes are validated up front; a box with out-of-order corners yields
/// [`Error::MalformedBox`] and an empty detection set yields
/// [`Error::EmptyDetections`].
pub fn mean_average_precision(
    detections: &[Detection],
    ground_truths: &[GroundTruth],
    params: &Params,
) -> Result<Evaluation> {
    for det in detections {
        geometry::validate_box(&det.bbox)?;
    }
    for gt in ground_truths {
        geometry::validate_box(&gt.bbox)?;
    }

    let mut categories: Vec<CategoryId> =
        detections.iter().map(|d| d.category_id.clone()).collect();
    categories.sort();
    categories.dedup();

    if categories.is_empty() {
        return Err(Error::EmptyDetections);
    }

    // Each category's evaluation is independent; run them in parallel.
    let per_category: Vec<CategoryEval> = categories
        .par_iter()
        .map(|category| {
            let relevant_dets: Vec<&Detection> = if params.class_agnostic {
                detections.iter().filter(|d| d.score > 0.0).collect()
            } else {
                detections
                    .iter()
                    .filter(|d| &d.category_id == category)
                    .collect()
            };
            let relevant_gts: Vec<&GroundTruth> = ground_truths
                .iter()
                .filter(|g| &g.category_id == category)
                .collect();

            let det_boxes: Vec<[f64; 4]> = relevant_dets.iter().map(|d| d.bbox).collect();
            let gt_boxes: Vec<[f64; 4]> = relevant_gts.iter().map(|g| g.bbox).collect();

            let ious = geometry::iou_matrix(&det_boxes, &gt_boxes);
            let (tp, fp) = match_detections(&ious, gt_boxes.len(), params.iou_threshold);
            let (recall, precision) = precision_recall_curve(&tp, &fp, gt_boxes.len());
            let ap = interpolated_ap(&recall, &precision, &params.recall_thresholds);

            let true_positives = tp.iter().filter(|&&t| t).count();
            debug!(
                category = %category,
                detections = relevant_dets.len(),
                ground_truths = relevant_gts.len(),
                true_positives,
                ap,
                "category evaluated"
            );

            CategoryEval {
                category_id: category.clone(),
                ap,
                num_detections: relevant_dets.len(),
                num_ground_truths: relevant_gts.len(),
                true_positives,
            }
        })
        .collect();

    let map = per_category.iter().map(|c| c.ap).sum::<f64>() / per_category.len() as f64;

    Ok(Evaluation { map, per_category })
}

/// Greedily assign each detection to its best-IoU ground truth.
///
/// Detections are scanned in input order. For each, the best ground truth is
/// the argmax of its IoU row over ALL ground truths (ties resolve to the
/// lowest index). The detection is a true positive when that best IoU
/// strictly exceeds the threshold and the ground truth is still unclaimed;
/// every other detection, including a best IoU exactly at the threshold, is
/// a false positive. With zero ground truths every row is empty and every
/// detection is a false positive.
fn match_detections(
    ious: &[Vec<f64>],
    num_gt: usize,
    iou_threshold: f64,
) -> (Vec<bool>, Vec<bool>) {
    let num_det = ious.len();
    let mut true_positives = vec![false; num_det];
    let mut false_positives = vec![false; num_det];
    let mut gt_matched = vec![false; num_gt];

    for (d, row) in ious.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (g, &iou) in row.iter().enumerate() {
            match best {
                Some((_, best_iou)) if iou <= best_iou => {}
                _ => best = Some((g, iou)),
            }
        }

        match best {
            Some((g, best_iou)) if best_iou > iou_threshold && !gt_matched[g] => {
                true_positives[d] = true;
                gt_matched[g] = true;
            }
            _ => false_positives[d] = true,
        }
    }

    (true_positives, false_positives)
}

/// Cumulative precision/recall over the detection sequence.
///
/// `num_gt` of zero pins recall at 0.0: nothing can be recalled from an
/// empty reference set.
fn precision_recall_curve(tp: &[bool], fp: &[bool], num_gt: usize) -> (Vec<f64>, Vec<f64>) {
    let mut recall = Vec::with_capacity(tp.len());
    let mut precision = Vec::with_capacity(tp.len());
    let mut cum_tp = 0usize;
    let mut cum_fp = 0usize;

    for (&t, &f) in tp.iter().zip(fp) {
        cum_tp += t as usize;
        cum_fp += f as usize;
        recall.push(if num_gt == 0 {
            0.0
        } else {
            cum_tp as f64 / num_gt as f64
        });
        precision.push(cum_tp as f64 / (cum_tp + cum_fp) as f64);
    }

    (recall, precision)
}

/// Interpolated average precision over a fixed recall grid.
///
/// The (recall, precision) pairs are sorted by recall descending internally,
/// so callers may pass the curve in any order. Each grid point contributes
/// the maximum precision among pairs whose recall reaches it, or 0.0 when
/// none does; AP is the mean contribution over the grid.
fn interpolated_ap(recall: &[f64], precision: &[f64], recall_thresholds: &[f64]) -> f64 {
    if recall_thresholds.is_empty() {
        return 0.0;
    }

    let mut curve: Vec<(f64, f64)> = recall
        .iter()
        .copied()
        .zip(precision.iter().copied())
        .collect();
    curve.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut sum = 0.0;
    for &r in recall_thresholds {
        let p = curve
            .iter()
            .take_while(|&&(rec, _)| rec >= r)
            .map(|&(_, prec)| prec)
            .fold(0.0, f64::max);
        sum += p;
    }

    sum / recall_thresholds.len() as f64
}
